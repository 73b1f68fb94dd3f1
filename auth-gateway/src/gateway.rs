use crate::challenge::{ChallengeVerifier, FixedCodeVerifier};
use crate::config::GatewayConfig;
use crate::error::{AuthError, Result};
use crate::models::LoginOutcome;
use auth_identity::{
    is_valid_email, normalize_email, Clock, CredentialHasher, CredentialStore, Identity,
    InMemoryCredentialStore, Role, SystemClock,
};
use auth_recovery::{CodeTransport, RecoveryConfig, RecoveryEngine, TracingTransport};
use auth_session::{InMemorySnapshotStore, SessionConfig, SessionManager};
use auth_throttle::{LoginThrottle, ResetRequestLimiter, ThrottleConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// The single authentication contract consumed by UI collaborators.
///
/// Owns exactly one piece of cross-cutting state: the login candidate
/// suspended at the MFA boundary. Everything else lives in the injected
/// collaborators.
pub struct AuthGateway {
    store: Arc<dyn CredentialStore>,
    login_throttle: Arc<LoginThrottle>,
    reset_limiter: Arc<ResetRequestLimiter>,
    recovery: Arc<RecoveryEngine>,
    sessions: SessionManager,
    challenge: Arc<dyn ChallengeVerifier>,
    transport: Arc<dyn CodeTransport>,
    clock: Arc<dyn Clock>,
    hasher: CredentialHasher,
    config: GatewayConfig,
    pending_challenge: Mutex<Option<Identity>>,
}

impl AuthGateway {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        login_throttle: Arc<LoginThrottle>,
        reset_limiter: Arc<ResetRequestLimiter>,
        recovery: Arc<RecoveryEngine>,
        sessions: SessionManager,
        challenge: Arc<dyn ChallengeVerifier>,
        transport: Arc<dyn CodeTransport>,
        clock: Arc<dyn Clock>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            store,
            login_throttle,
            reset_limiter,
            recovery,
            sessions,
            challenge,
            transport,
            clock,
            hasher: CredentialHasher::new(),
            config,
            pending_challenge: Mutex::new(None),
        }
    }

    /// Fully in-memory gateway with default policies, the system clock,
    /// the demo challenge verifier and the log-stream code transport.
    pub fn in_memory() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
        let config = GatewayConfig::default();
        let throttle_config = ThrottleConfig::default();
        Self::new(
            store.clone(),
            Arc::new(LoginThrottle::new(clock.clone(), throttle_config.clone())),
            Arc::new(ResetRequestLimiter::new(clock.clone(), throttle_config)),
            Arc::new(RecoveryEngine::new(
                store,
                clock.clone(),
                config.password_policy.clone(),
                RecoveryConfig::default(),
            )),
            SessionManager::new(
                clock.clone(),
                Arc::new(InMemorySnapshotStore::new()),
                SessionConfig::default(),
            ),
            Arc::new(FixedCodeVerifier::default()),
            Arc::new(TracingTransport),
            clock,
            config,
        )
    }

    /// Session manager handle, e.g. for registering the logout handler.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Check credentials and either establish a session or suspend at the
    /// MFA boundary.
    ///
    /// The lockout check runs strictly before any credential comparison,
    /// so a locked account is rejected without revealing whether the
    /// password was otherwise correct.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginOutcome> {
        let email = normalize_email(identifier);

        let status = self.login_throttle.check(&email);
        if status.is_locked {
            return Err(AuthError::AccountLocked {
                remaining_minutes: status.remaining_minutes(),
            });
        }

        // Failures are recorded for unknown identifiers too, so the error
        // shape never separates "no such account" from "wrong password".
        let identity = self.store.find_by_email(&email).await?;
        let matched = identity
            .as_ref()
            .map(|id| self.hasher.verify(password, &id.password_hash))
            .unwrap_or(false);
        let Some(identity) = identity.filter(|_| matched) else {
            return Err(self.failed_attempt(&email));
        };

        self.login_throttle.reset(&email);
        self.store
            .update_last_active(&email, self.clock.now())
            .await?;

        if identity.mfa_enabled {
            self.challenge.begin(&identity).await?;
            *self.pending_challenge.lock() = Some(identity);
            info!(identifier = %email, "login suspended pending second factor");
            return Ok(LoginOutcome::ChallengeRequired);
        }

        self.sessions.establish(identity.clone());
        Ok(LoginOutcome::Authenticated(identity))
    }

    fn failed_attempt(&self, email: &str) -> AuthError {
        let status = self.login_throttle.record_failure(email);
        if status.is_locked {
            AuthError::AccountLocked {
                remaining_minutes: status.remaining_minutes(),
            }
        } else {
            AuthError::InvalidCredentials
        }
    }

    /// Resolve a login suspended at the MFA boundary.
    ///
    /// With no pending candidate this is a deterministic `false`, never an
    /// error: a UI may call it after an unrelated navigation. A failed
    /// code keeps the candidate so the caller can retry.
    pub async fn verify_challenge(&self, code: &str) -> bool {
        let candidate = self.pending_challenge.lock().clone();
        let Some(identity) = candidate else {
            return false;
        };

        if !self.challenge.verify(&identity, code).await {
            return false;
        }

        *self.pending_challenge.lock() = None;
        self.sessions.establish(identity.clone());
        info!(user_id = %identity.id, "second factor accepted, session established");
        true
    }

    /// Create an account. The new identity starts with an unverified email
    /// and, by default, an immediately established session.
    pub async fn register(
        &self,
        display_name: &str,
        identifier: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity> {
        let email = normalize_email(identifier);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidFormat);
        }
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateIdentifier);
        }
        self.config.password_policy.validate(password)?;

        let now = self.clock.now();
        let identity = Identity {
            id: Uuid::new_v4(),
            email,
            display_name: display_name.to_string(),
            role,
            password_hash: self.hasher.hash(password)?,
            mfa_enabled: false,
            mfa_secret: None,
            email_verified: false,
            created_at: now,
            last_active_at: None,
        };
        let identity = self.store.insert(identity).await?;
        info!(user_id = %identity.id, role = ?identity.role, "account registered");

        if self.config.auto_login_after_registration {
            self.sessions.establish(identity.clone());
        }
        Ok(identity)
    }

    /// Change the signed-in user's password after re-verifying the old one.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        let Some(session) = self.sessions.current() else {
            return Err(AuthError::NotFound);
        };
        let email = normalize_email(&session.identity.email);
        let Some(identity) = self.store.find_by_email(&email).await? else {
            return Err(AuthError::NotFound);
        };
        if !self.hasher.verify(current_password, &identity.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        self.config.password_policy.validate(new_password)?;

        let new_hash = self.hasher.hash(new_password)?;
        self.store.update_credential(&email, &new_hash).await?;
        info!(user_id = %identity.id, "password changed");
        Ok(())
    }

    /// End the current session and drop any suspended login.
    pub fn logout(&self) {
        *self.pending_challenge.lock() = None;
        self.sessions.clear();
    }

    /// Single-device scope: same as `logout`, but also purges the
    /// persisted snapshot even if no live session exists.
    pub fn logout_all_sessions(&self) {
        self.logout();
        self.sessions.purge_snapshot();
    }

    /// Start a credential-recovery flow.
    ///
    /// The response is identical whether or not the identifier is
    /// registered; the code is only ever delivered to a real account.
    pub async fn request_password_reset(&self, identifier: &str) -> Result<()> {
        let email = normalize_email(identifier);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidFormat);
        }

        self.reset_limiter.record_request(&email)?;
        let issued = self.recovery.issue(&email)?;

        if self.store.find_by_email(&email).await?.is_some() {
            if let Err(err) = self.transport.deliver(&email, &issued.code).await {
                // Delivery failures stay internal: surfacing them only for
                // registered accounts would leak registration status.
                warn!(error = %err, "recovery code delivery failed");
            }
        }

        info!("password reset requested");
        Ok(())
    }

    /// Complete a credential-recovery flow with the delivered code.
    pub async fn reset_password(
        &self,
        identifier: &str,
        code: &str,
        new_password: &str,
    ) -> Result<bool> {
        let email = normalize_email(identifier);
        self.recovery
            .consume_for_reset(&email, code, new_password)
            .await?;
        // A proven mailbox reset also clears any standing lockout.
        self.login_throttle.reset(&email);
        Ok(true)
    }

    /// Abandon a recovery flow, dropping any code on file.
    pub fn abandon_password_reset(&self, identifier: &str) {
        self.recovery.invalidate(&normalize_email(identifier));
    }

    /// Role check against the current session, evaluated over the fixed
    /// role hierarchy. `false` with no session.
    pub fn has_permission(&self, required: Role) -> bool {
        self.sessions
            .current()
            .map(|session| session.identity.role.satisfies(required))
            .unwrap_or(false)
    }

    /// Admin action: clear a lockout for an identifier. Returns whether a
    /// record was cleared.
    pub fn unlock_account(&self, identifier: &str) -> Result<bool> {
        if !self.has_permission(Role::Admin) {
            return Err(AuthError::Forbidden);
        }
        Ok(self.login_throttle.unlock(&normalize_email(identifier)))
    }

    /// Enroll the signed-in user in MFA. A TOTP deployment passes the
    /// enrolled secret; transport-backed verifiers pass `None`.
    pub async fn enable_mfa(&self, secret: Option<String>) -> Result<Identity> {
        self.update_current_identity(|identity| {
            identity.mfa_enabled = true;
            identity.mfa_secret = secret.clone();
        })
        .await
    }

    pub async fn disable_mfa(&self) -> Result<Identity> {
        self.update_current_identity(|identity| {
            identity.mfa_enabled = false;
            identity.mfa_secret = None;
        })
        .await
    }

    async fn update_current_identity<F>(&self, apply: F) -> Result<Identity>
    where
        F: Fn(&mut Identity),
    {
        let Some(session) = self.sessions.current() else {
            return Err(AuthError::NotFound);
        };
        let email = normalize_email(&session.identity.email);
        let Some(mut identity) = self.store.find_by_email(&email).await? else {
            return Err(AuthError::NotFound);
        };
        apply(&mut identity);
        let updated = self.store.update(identity).await?;
        Ok(updated)
    }

    /// Mark user activity, sliding the session expiry forward.
    pub fn touch(&self) {
        self.sessions.touch();
    }

    /// Resume a persisted session at startup, if any survives validation.
    pub fn restore(&self) -> Option<Identity> {
        self.sessions.restore()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.sessions.current().map(|session| session.identity)
    }
}
