use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Failed logins allowed before the account locks.
    pub max_login_attempts: u32,
    /// How long a lockout lasts.
    pub lockout_duration_minutes: i64,
    /// Reset requests allowed per rolling window.
    pub max_reset_requests: u32,
    /// Rolling window for reset requests, anchored at its first request.
    pub reset_window_hours: i64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_login_attempts: 5,
            lockout_duration_minutes: 30,
            max_reset_requests: 3,
            reset_window_hours: 24,
        }
    }
}
