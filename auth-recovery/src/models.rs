use chrono::{DateTime, Duration, Utc};

/// Stored state of an issued code.
#[derive(Debug, Clone)]
pub struct RecoveryCode {
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub resend_available_at: DateTime<Utc>,
    pub attempts: u32,
    pub used: bool,
}

/// What `issue` hands back to the caller for delivery.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub identifier: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Fraction of a code's lifetime still remaining, clamped to `[0.0, 1.0]`.
///
/// Presentation layers call this on their own render cadence to show a
/// countdown; the deadline itself stays authoritative in the engine.
pub fn remaining_fraction(now: DateTime<Utc>, issued_at: DateTime<Utc>, ttl: Duration) -> f64 {
    let ttl_ms = ttl.num_milliseconds();
    if ttl_ms <= 0 {
        return 0.0;
    }
    let elapsed_ms = (now - issued_at).num_milliseconds();
    if elapsed_ms <= 0 {
        return 1.0;
    }
    if elapsed_ms >= ttl_ms {
        return 0.0;
    }
    1.0 - elapsed_ms as f64 / ttl_ms as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_fraction_clamps_and_interpolates() {
        let issued = Utc::now();
        let ttl = Duration::minutes(15);

        assert_eq!(remaining_fraction(issued, issued, ttl), 1.0);
        assert_eq!(remaining_fraction(issued + ttl, issued, ttl), 0.0);
        assert_eq!(remaining_fraction(issued + Duration::hours(2), issued, ttl), 0.0);
        assert_eq!(remaining_fraction(issued - Duration::minutes(1), issued, ttl), 1.0);

        let halfway = remaining_fraction(issued + Duration::seconds(450), issued, ttl);
        assert!((halfway - 0.5).abs() < 1e-9);
    }

    #[test]
    fn remaining_fraction_handles_zero_ttl() {
        let issued = Utc::now();
        assert_eq!(remaining_fraction(issued, issued, Duration::zero()), 0.0);
    }
}
