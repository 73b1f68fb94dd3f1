use auth_identity::IdentityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("Invalid email format")]
    InvalidFormat,

    #[error("A code was sent recently, wait {seconds_remaining} seconds before requesting another")]
    ResendTooSoon { seconds_remaining: i64 },

    #[error("No recovery code on file")]
    NotFound,

    #[error("This code has already been used")]
    AlreadyUsed,

    #[error("This code has expired, request a new one")]
    Expired,

    #[error("Too many incorrect attempts, request a new code")]
    AttemptsExceeded,

    #[error("Incorrect code, {attempts_remaining} attempts remaining")]
    IncorrectCode { attempts_remaining: u32 },

    #[error("Password does not meet the minimum strength requirements")]
    WeakPassword,

    #[error(transparent)]
    Store(IdentityError),
}

impl From<IdentityError> for RecoveryError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::WeakPassword => RecoveryError::WeakPassword,
            IdentityError::InvalidFormat => RecoveryError::InvalidFormat,
            other => RecoveryError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecoveryError>;
