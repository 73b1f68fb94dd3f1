//! One-time recovery codes for CliniCore Engine
//!
//! The [`RecoveryEngine`] issues, verifies and consumes 6-digit numeric
//! codes tied to an identifier. Codes are single-use, expire on a fixed
//! wall-clock deadline, cap verification attempts independently of expiry,
//! and throttle re-issues behind a resend cooldown. Deadlines are checked
//! lazily at the next relevant call; the engine owns deadline data only and
//! never runs a countdown of its own.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod transport;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use models::*;
pub use transport::*;
