use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThrottleError {
    #[error("Too many reset requests, try again in about {hours_remaining} hours")]
    RateLimited { hours_remaining: i64 },
}

pub type Result<T> = std::result::Result<T, ThrottleError>;
