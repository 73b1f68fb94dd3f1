use auth_identity::IdentityError;
use auth_recovery::RecoveryError;
use auth_throttle::ThrottleError;
use thiserror::Error;

/// User-facing error taxonomy surfaced by the gateway.
///
/// Every variant is a recoverable condition the UI renders directly; the
/// wording never reveals whether a given identifier is registered.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Account temporarily locked, try again in {remaining_minutes} minutes")]
    AccountLocked { remaining_minutes: i64 },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    DuplicateIdentifier,

    #[error("Password does not meet the minimum strength requirements")]
    WeakPassword,

    #[error("Too many reset requests, try again in about {hours_remaining} hours")]
    RateLimited { hours_remaining: i64 },

    #[error("Invalid email format")]
    InvalidFormat,

    #[error("A code was sent recently, wait {seconds_remaining} seconds before requesting another")]
    ResendTooSoon { seconds_remaining: i64 },

    #[error("This code has expired, request a new one")]
    Expired,

    #[error("This code has already been used")]
    AlreadyUsed,

    #[error("Too many incorrect attempts, request a new code")]
    AttemptsExceeded,

    #[error("Incorrect code, {attempts_remaining} attempts remaining")]
    IncorrectCode { attempts_remaining: u32 },

    #[error("Account not found")]
    NotFound,

    #[error("Not authorized to perform this action")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateIdentifier => AuthError::DuplicateIdentifier,
            IdentityError::NotFound => AuthError::NotFound,
            IdentityError::WeakPassword => AuthError::WeakPassword,
            IdentityError::InvalidFormat => AuthError::InvalidFormat,
            IdentityError::Hashing => {
                AuthError::Internal(anyhow::anyhow!("credential hashing failed"))
            }
        }
    }
}

impl From<ThrottleError> for AuthError {
    fn from(err: ThrottleError) -> Self {
        match err {
            ThrottleError::RateLimited { hours_remaining } => {
                AuthError::RateLimited { hours_remaining }
            }
        }
    }
}

impl From<RecoveryError> for AuthError {
    fn from(err: RecoveryError) -> Self {
        match err {
            RecoveryError::InvalidFormat => AuthError::InvalidFormat,
            RecoveryError::ResendTooSoon { seconds_remaining } => {
                AuthError::ResendTooSoon { seconds_remaining }
            }
            RecoveryError::NotFound => AuthError::NotFound,
            RecoveryError::AlreadyUsed => AuthError::AlreadyUsed,
            RecoveryError::Expired => AuthError::Expired,
            RecoveryError::AttemptsExceeded => AuthError::AttemptsExceeded,
            RecoveryError::IncorrectCode { attempts_remaining } => {
                AuthError::IncorrectCode { attempts_remaining }
            }
            RecoveryError::WeakPassword => AuthError::WeakPassword,
            RecoveryError::Store(inner) => inner.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
