//! Identity records and credential storage for CliniCore Engine
//!
//! This crate owns the pieces of the authentication core that every other
//! auth crate builds on:
//! - The [`Identity`] record and the closed [`Role`] set
//! - The [`CredentialStore`] seam with an in-memory implementation
//! - Argon2 credential hashing and the canonical password policy
//! - The [`Clock`] abstraction that keeps every wall-clock rule testable

pub mod clock;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;

pub use clock::*;
pub use error::*;
pub use models::*;
pub use policy::*;
pub use repository::*;
