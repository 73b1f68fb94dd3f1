use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("An account with this email already exists")]
    DuplicateIdentifier,

    #[error("Account not found")]
    NotFound,

    #[error("Password does not meet the minimum strength requirements")]
    WeakPassword,

    #[error("Invalid email format")]
    InvalidFormat,

    #[error("Credential hashing failed")]
    Hashing,
}

pub type Result<T> = std::result::Result<T, IdentityError>;
