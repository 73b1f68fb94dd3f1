//! Authentication orchestration for CliniCore Engine
//!
//! The [`AuthGateway`] is the single contract the UI shell talks to. It
//! coordinates the credential store, the attempt trackers, the recovery
//! code engine and the session manager into the login, registration,
//! MFA-challenge, logout and credential-reset use cases, and owns the one
//! piece of cross-cutting state: the pending-MFA login candidate.
//!
//! All collaborators are injected at construction, so tests (and embedders)
//! instantiate isolated gateways per case instead of sharing ambient
//! globals.
//!
//! # Example
//!
//! ```rust
//! use auth_gateway::AuthGateway;
//! use auth_identity::Role;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = AuthGateway::in_memory();
//!
//!     gateway
//!         .register("Ana", "ana@clinic.com", "Aa1!aaaaaa", Role::Patient)
//!         .await?;
//!     assert!(gateway.has_permission(Role::Patient));
//!
//!     Ok(())
//! }
//! ```

pub mod challenge;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;

pub use challenge::*;
pub use config::*;
pub use error::*;
pub use gateway::*;
pub use models::*;
