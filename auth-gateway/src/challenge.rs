use async_trait::async_trait;
use auth_identity::Identity;
use auth_recovery::{generate_numeric_code, CodeTransport};
use dashmap::DashMap;
use std::sync::Arc;
use totp_rs::{Algorithm, Secret, TOTP};
use tracing::debug;

/// Second-factor verification capability.
///
/// The gateway suspends a login at the MFA boundary and later asks the
/// installed verifier to judge the submitted code. Swapping the verifier
/// never touches the orchestration.
#[async_trait]
pub trait ChallengeVerifier: Send + Sync {
    /// Invoked when a login suspends at the MFA boundary, e.g. to push a
    /// code at the user. Verifiers with nothing to send keep the default.
    async fn begin(&self, _identity: &Identity) -> anyhow::Result<()> {
        Ok(())
    }

    async fn verify(&self, identity: &Identity, code: &str) -> bool;
}

/// Demo/test verifier accepting one fixed shared code.
///
/// Stands in for a real second factor in local development only.
pub struct FixedCodeVerifier {
    code: String,
}

impl FixedCodeVerifier {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Default for FixedCodeVerifier {
    fn default() -> Self {
        Self::new("123456")
    }
}

#[async_trait]
impl ChallengeVerifier for FixedCodeVerifier {
    async fn verify(&self, _identity: &Identity, code: &str) -> bool {
        code == self.code
    }
}

/// RFC 6238 verifier over the identity's enrolled secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotpVerifier;

impl TotpVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChallengeVerifier for TotpVerifier {
    async fn verify(&self, identity: &Identity, code: &str) -> bool {
        let Some(secret) = identity.mfa_secret.as_deref() else {
            debug!(user_id = %identity.id, "totp challenge without enrolled secret");
            return false;
        };
        let Ok(secret_bytes) = Secret::Encoded(secret.to_string()).to_bytes() else {
            return false;
        };
        let Ok(totp) = TOTP::new(Algorithm::SHA1, 6, 1, 30, secret_bytes) else {
            return false;
        };
        totp.check_current(code).unwrap_or(false)
    }
}

/// Verifier that pushes a fresh one-time code through a transport when the
/// challenge starts and accepts it exactly once.
pub struct SmsCodeVerifier {
    transport: Arc<dyn CodeTransport>,
    pending: DashMap<String, String>,
}

impl SmsCodeVerifier {
    pub fn new(transport: Arc<dyn CodeTransport>) -> Self {
        Self {
            transport,
            pending: DashMap::new(),
        }
    }
}

#[async_trait]
impl ChallengeVerifier for SmsCodeVerifier {
    async fn begin(&self, identity: &Identity) -> anyhow::Result<()> {
        let code = generate_numeric_code();
        self.pending.insert(identity.email.clone(), code.clone());
        self.transport.deliver(&identity.email, &code).await
    }

    async fn verify(&self, identity: &Identity, code: &str) -> bool {
        self.pending
            .remove_if(&identity.email, |_, expected| expected == code)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_identity::Role;
    use chrono::Utc;
    use parking_lot::Mutex;
    use uuid::Uuid;

    fn identity(secret: Option<&str>) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: "ana@clinic.com".to_string(),
            display_name: "Ana".to_string(),
            role: Role::Patient,
            password_hash: "hash".to_string(),
            mfa_enabled: true,
            mfa_secret: secret.map(str::to_string),
            email_verified: true,
            created_at: Utc::now(),
            last_active_at: None,
        }
    }

    #[tokio::test]
    async fn fixed_code_verifier_accepts_only_its_code() {
        let verifier = FixedCodeVerifier::default();
        let identity = identity(None);
        assert!(verifier.verify(&identity, "123456").await);
        assert!(!verifier.verify(&identity, "654321").await);
    }

    #[tokio::test]
    async fn totp_verifier_rejects_without_enrolled_secret() {
        let verifier = TotpVerifier::new();
        assert!(!verifier.verify(&identity(None), "123456").await);
    }

    struct RecordingTransport {
        delivered: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl CodeTransport for RecordingTransport {
        async fn deliver(&self, identifier: &str, code: &str) -> anyhow::Result<()> {
            self.delivered
                .lock()
                .push((identifier.to_string(), code.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn sms_verifier_accepts_the_delivered_code_once() {
        let transport = Arc::new(RecordingTransport {
            delivered: Mutex::new(Vec::new()),
        });
        let verifier = SmsCodeVerifier::new(transport.clone());
        let identity = identity(None);

        verifier.begin(&identity).await.unwrap();
        let code = transport.delivered.lock()[0].1.clone();

        assert!(!verifier.verify(&identity, "000000").await);
        // An incorrect guess does not consume the pending code...
        assert!(verifier.verify(&identity, &code).await);
        // ...but a correct one does.
        assert!(!verifier.verify(&identity, &code).await);
    }
}
