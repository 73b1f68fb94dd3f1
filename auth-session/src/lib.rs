//! Session lifecycle for CliniCore Engine
//!
//! A single active session per manager instance, with sliding expiry,
//! active enforcement through a scheduled expiry task, and a three-key
//! client-side snapshot kept in lockstep with the live state. Expiry is a
//! normal transition, not an error: it must invoke the registered logout
//! handler exactly once, even when a renewal races the timer.

pub mod config;
pub mod manager;
pub mod models;
pub mod snapshot;

pub use config::*;
pub use manager::*;
pub use models::*;
pub use snapshot::*;
