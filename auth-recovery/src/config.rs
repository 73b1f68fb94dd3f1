use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Lifetime of an issued code.
    pub code_ttl_minutes: i64,
    /// Verification attempts allowed per code.
    pub max_verify_attempts: u32,
    /// Cooldown before the same identifier can be issued another code.
    pub resend_cooldown_seconds: i64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 15,
            max_verify_attempts: 5,
            resend_cooldown_seconds: 120,
        }
    }
}
