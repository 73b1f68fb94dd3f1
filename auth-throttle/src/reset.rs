use crate::config::ThrottleConfig;
use crate::error::{Result, ThrottleError};
use auth_identity::Clock;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
struct RequestWindow {
    requests: u32,
    window_started_at: DateTime<Utc>,
}

/// Rolling-window limiter for password-reset requests.
///
/// The window is anchored at the first request it contains; once the full
/// window has elapsed the counter restarts at one with a new anchor.
pub struct ResetRequestLimiter {
    windows: DashMap<String, RequestWindow>,
    clock: Arc<dyn Clock>,
    config: ThrottleConfig,
}

impl ResetRequestLimiter {
    pub fn new(clock: Arc<dyn Clock>, config: ThrottleConfig) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
            config,
        }
    }

    /// Count a reset request. Fails with [`ThrottleError::RateLimited`]
    /// once the window's budget is exhausted.
    pub fn record_request(&self, key: &str) -> Result<u32> {
        let now = self.clock.now();
        let window = Duration::hours(self.config.reset_window_hours);
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| RequestWindow {
                requests: 0,
                window_started_at: now,
            });

        if now - entry.window_started_at >= window {
            entry.requests = 0;
            entry.window_started_at = now;
        }

        if entry.requests >= self.config.max_reset_requests {
            let reopens_at = entry.window_started_at + window;
            let remaining = reopens_at - now;
            let hours_remaining = ((remaining.num_minutes() + 59) / 60).max(1);
            warn!(
                identifier = %key,
                requests = entry.requests,
                reopens_at = %reopens_at,
                "reset requests rate limited"
            );
            return Err(ThrottleError::RateLimited { hours_remaining });
        }

        entry.requests += 1;
        Ok(entry.requests)
    }
}
