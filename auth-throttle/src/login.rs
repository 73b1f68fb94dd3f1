use crate::config::ThrottleConfig;
use auth_identity::Clock;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Lockout state reported to callers.
#[derive(Debug, Clone)]
pub struct LockoutStatus {
    /// Whether the identifier is currently locked.
    pub is_locked: bool,
    /// When the lockout expires.
    pub locked_until: Option<DateTime<Utc>>,
    /// Current failed attempt count.
    pub failed_attempts: u32,
    /// Time left on the lockout while locked.
    pub remaining: Option<Duration>,
}

impl LockoutStatus {
    fn unlocked(failed_attempts: u32) -> Self {
        Self {
            is_locked: false,
            locked_until: None,
            failed_attempts,
            remaining: None,
        }
    }

    fn locked(until: DateTime<Utc>, failed_attempts: u32, now: DateTime<Utc>) -> Self {
        Self {
            is_locked: true,
            locked_until: Some(until),
            failed_attempts,
            remaining: Some(until - now),
        }
    }

    /// Remaining lockout in whole minutes, rounded up, at least 1 while locked.
    pub fn remaining_minutes(&self) -> i64 {
        match self.remaining {
            Some(remaining) => ((remaining.num_seconds() + 59) / 60).max(1),
            None => 0,
        }
    }
}

#[derive(Debug, Default)]
struct LoginRecord {
    failures: u32,
    locked_until: Option<DateTime<Utc>>,
}

/// Per-identifier failed-login tracker with fixed-threshold lockout.
///
/// A record whose lockout window has fully elapsed behaves as if it never
/// existed; the elapsed state is cleared lazily whenever it is read.
pub struct LoginThrottle {
    records: DashMap<String, LoginRecord>,
    clock: Arc<dyn Clock>,
    config: ThrottleConfig,
}

impl LoginThrottle {
    pub fn new(clock: Arc<dyn Clock>, config: ThrottleConfig) -> Self {
        Self {
            records: DashMap::new(),
            clock,
            config,
        }
    }

    fn lockout_window(&self) -> Duration {
        Duration::minutes(self.config.lockout_duration_minutes)
    }

    /// Current lockout state. Clears an elapsed lock as a side effect of
    /// the read, so callers always observe post-window state.
    pub fn check(&self, key: &str) -> LockoutStatus {
        let now = self.clock.now();
        let Some(mut record) = self.records.get_mut(key) else {
            return LockoutStatus::unlocked(0);
        };

        if let Some(until) = record.locked_until {
            if now < until {
                return LockoutStatus::locked(until, record.failures, now);
            }
            // Window elapsed: the record resets, counting starts over.
            record.failures = 0;
            record.locked_until = None;
        }

        LockoutStatus::unlocked(record.failures)
    }

    /// Record a failed login. Reaching the threshold locks the identifier
    /// for the configured window and reports the locked state.
    pub fn record_failure(&self, key: &str) -> LockoutStatus {
        let now = self.clock.now();
        let mut record = self.records.entry(key.to_string()).or_default();

        if let Some(until) = record.locked_until {
            if now < until {
                return LockoutStatus::locked(until, record.failures, now);
            }
            record.failures = 0;
            record.locked_until = None;
        }

        record.failures += 1;

        if record.failures >= self.config.max_login_attempts {
            let until = now + self.lockout_window();
            record.locked_until = Some(until);
            warn!(
                identifier = %key,
                failed_attempts = record.failures,
                locked_until = %until,
                "account locked after too many failed logins"
            );
            return LockoutStatus::locked(until, record.failures, now);
        }

        LockoutStatus::unlocked(record.failures)
    }

    /// Clear the record on successful login.
    pub fn reset(&self, key: &str) {
        self.records.remove(key);
    }

    /// Admin-initiated unlock. Returns whether a record was cleared.
    pub fn unlock(&self, key: &str) -> bool {
        let removed = self.records.remove(key).is_some();
        if removed {
            info!(identifier = %key, "account unlocked by admin");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_identity::ManualClock;

    fn throttle() -> (Arc<ManualClock>, LoginThrottle) {
        let clock = Arc::new(ManualClock::default());
        let throttle = LoginThrottle::new(clock.clone(), ThrottleConfig::default());
        (clock, throttle)
    }

    #[test]
    fn locks_on_fifth_failure() {
        let (_clock, throttle) = throttle();

        for _ in 0..4 {
            let status = throttle.record_failure("ana@clinic.com");
            assert!(!status.is_locked);
        }

        let status = throttle.record_failure("ana@clinic.com");
        assert!(status.is_locked);
        assert_eq!(status.failed_attempts, 5);
        assert!(status.remaining_minutes() >= 29);
    }

    #[test]
    fn lock_clears_after_window_elapses() {
        let (clock, throttle) = throttle();

        for _ in 0..5 {
            throttle.record_failure("ana@clinic.com");
        }
        assert!(throttle.check("ana@clinic.com").is_locked);

        clock.advance(Duration::minutes(29));
        assert!(throttle.check("ana@clinic.com").is_locked);

        clock.advance(Duration::minutes(2));
        let status = throttle.check("ana@clinic.com");
        assert!(!status.is_locked);
        assert_eq!(status.failed_attempts, 0);
    }

    #[test]
    fn reset_restarts_counting_from_one() {
        let (_clock, throttle) = throttle();

        for _ in 0..4 {
            throttle.record_failure("ana@clinic.com");
        }
        throttle.reset("ana@clinic.com");

        let status = throttle.record_failure("ana@clinic.com");
        assert_eq!(status.failed_attempts, 1);
        assert!(!status.is_locked);
    }

    #[test]
    fn failure_after_elapsed_lock_counts_from_one() {
        let (clock, throttle) = throttle();

        for _ in 0..5 {
            throttle.record_failure("ana@clinic.com");
        }
        clock.advance(Duration::minutes(31));

        let status = throttle.record_failure("ana@clinic.com");
        assert_eq!(status.failed_attempts, 1);
        assert!(!status.is_locked);
    }

    #[test]
    fn unlock_clears_an_active_lock() {
        let (_clock, throttle) = throttle();

        for _ in 0..5 {
            throttle.record_failure("ana@clinic.com");
        }
        assert!(throttle.unlock("ana@clinic.com"));
        assert!(!throttle.check("ana@clinic.com").is_locked);
        assert!(!throttle.unlock("ana@clinic.com"));
    }
}
