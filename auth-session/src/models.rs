use auth_identity::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one live session a manager instance may hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
