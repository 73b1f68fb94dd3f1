use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime; pushed forward on every observed activity.
    pub lifetime_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_minutes: 30,
        }
    }
}
