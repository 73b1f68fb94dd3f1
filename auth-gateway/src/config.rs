use auth_identity::PasswordPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Whether a successful registration immediately establishes a session.
    /// Deployments that require a verified email first turn this off.
    pub auto_login_after_registration: bool,
    /// Strength policy applied to registration, password change and reset.
    pub password_policy: PasswordPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auto_login_after_registration: true,
            password_policy: PasswordPolicy::default(),
        }
    }
}
