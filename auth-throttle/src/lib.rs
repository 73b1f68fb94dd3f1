//! Attempt tracking for CliniCore Engine
//!
//! Two independent per-identifier trackers:
//! - [`LoginThrottle`]: consecutive failed logins, with a fixed-threshold
//!   lockout window cleared lazily once it has elapsed
//! - [`ResetRequestLimiter`]: password-reset requests over a rolling window
//!
//! Both are pure bookkeeping. Callers must consult them strictly before any
//! credential comparison so a locked account is rejected without revealing
//! whether the supplied credential was otherwise correct.

pub mod config;
pub mod error;
pub mod login;
pub mod reset;

pub use config::*;
pub use error::*;
pub use login::*;
pub use reset::*;
