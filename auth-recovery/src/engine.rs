use crate::config::RecoveryConfig;
use crate::error::{RecoveryError, Result};
use crate::models::{IssuedCode, RecoveryCode};
use auth_identity::{
    is_valid_email, normalize_email, Clock, CredentialHasher, CredentialStore, PasswordPolicy,
};
use chrono::Duration;
use dashmap::DashMap;
use rand::{rngs::OsRng, Rng};
use std::sync::Arc;
use tracing::{debug, info};

/// Issues, verifies and consumes one-time recovery codes.
///
/// One live code per identifier. Verifying a code does not consume it;
/// only completing a reset does. A caller abandoning the flow after a
/// successful verify should call [`RecoveryEngine::invalidate`].
pub struct RecoveryEngine {
    codes: DashMap<String, RecoveryCode>,
    store: Arc<dyn CredentialStore>,
    policy: PasswordPolicy,
    hasher: CredentialHasher,
    clock: Arc<dyn Clock>,
    config: RecoveryConfig,
}

/// Uniformly random 6-digit code, zero-padded.
pub fn generate_numeric_code() -> String {
    let n: u32 = OsRng.gen_range(0..1_000_000);
    format!("{n:06}")
}

impl RecoveryEngine {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
        policy: PasswordPolicy,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            codes: DashMap::new(),
            store,
            policy,
            hasher: CredentialHasher::new(),
            clock,
            config,
        }
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::minutes(self.config.code_ttl_minutes)
    }

    /// Issue a fresh code for an identifier, replacing any previous one.
    ///
    /// Works for any well-formed identifier whether or not an account
    /// exists, so request handling never reveals registration status.
    /// Delivery is the caller's concern.
    pub fn issue(&self, identifier: &str) -> Result<IssuedCode> {
        let key = normalize_email(identifier);
        if !is_valid_email(&key) {
            return Err(RecoveryError::InvalidFormat);
        }

        let now = self.clock.now();

        if let Some(existing) = self.codes.get(&key) {
            if now < existing.resend_available_at {
                let seconds_remaining =
                    (existing.resend_available_at - now).num_seconds().max(1);
                return Err(RecoveryError::ResendTooSoon { seconds_remaining });
            }
        }

        let code = generate_numeric_code();
        let record = RecoveryCode {
            code: code.clone(),
            issued_at: now,
            expires_at: now + self.code_ttl(),
            resend_available_at: now + Duration::seconds(self.config.resend_cooldown_seconds),
            attempts: 0,
            used: false,
        };
        let expires_at = record.expires_at;
        self.codes.insert(key.clone(), record);

        debug!(identifier = %key, expires_at = %expires_at, "recovery code issued");

        Ok(IssuedCode {
            identifier: key,
            code,
            issued_at: now,
            expires_at,
        })
    }

    /// Check a code without consuming it.
    ///
    /// Failure order: no code on file, already used, expired, attempt cap,
    /// then the comparison itself. The attempt counter only moves when the
    /// comparison is actually reached.
    pub fn verify(&self, identifier: &str, code: &str) -> Result<()> {
        let key = normalize_email(identifier);
        let now = self.clock.now();

        let mut record = self.codes.get_mut(&key).ok_or(RecoveryError::NotFound)?;

        if record.used {
            return Err(RecoveryError::AlreadyUsed);
        }
        if now > record.expires_at {
            return Err(RecoveryError::Expired);
        }
        if record.attempts >= self.config.max_verify_attempts {
            return Err(RecoveryError::AttemptsExceeded);
        }

        record.attempts += 1;
        if record.code != code {
            let attempts_remaining = self.config.max_verify_attempts - record.attempts;
            return Err(RecoveryError::IncorrectCode { attempts_remaining });
        }

        Ok(())
    }

    /// Complete a reset: verify the code, apply the password policy, update
    /// the stored credential and burn the code.
    pub async fn consume_for_reset(
        &self,
        identifier: &str,
        code: &str,
        new_password: &str,
    ) -> Result<()> {
        let key = normalize_email(identifier);

        self.verify(&key, code)?;
        self.policy.validate(new_password)?;

        let new_hash = self.hasher.hash(new_password)?;
        self.store.update_credential(&key, &new_hash).await?;

        // Burn only once the credential is actually updated.
        if let Some(mut record) = self.codes.get_mut(&key) {
            record.used = true;
        }

        info!(identifier = %key, "credential reset via recovery code");
        Ok(())
    }

    /// Drop any code on file, e.g. when the user abandons the flow.
    /// Returns whether a code was present.
    pub fn invalidate(&self, identifier: &str) -> bool {
        self.codes.remove(&normalize_email(identifier)).is_some()
    }

    /// Deadline data for a live code, for presentation-layer countdowns.
    pub fn issued_state(&self, identifier: &str) -> Option<(chrono::DateTime<chrono::Utc>, Duration)> {
        self.codes
            .get(&normalize_email(identifier))
            .map(|record| (record.issued_at, self.code_ttl()))
    }
}
