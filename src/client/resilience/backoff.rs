//! Exponential backoff with jitter and server-directed override.

use std::time::Duration;

use crate::client::error::parse_seconds;

/// Upper bound (exclusive) of the random jitter added to each delay.
const MAX_JITTER_MS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Delay before retry number `attempt + 1` (`attempt` counts from 0).
    ///
    /// A parsable `Retry-After` hint wins over the exponential schedule; both
    /// are capped at `max`.
    pub fn delay_for(&self, attempt: u32, server_hint: Option<&str>) -> Duration {
        self.delay_with_jitter(attempt, server_hint, rand::random::<f64>() * MAX_JITTER_MS)
    }

    pub(crate) fn delay_with_jitter(
        &self,
        attempt: u32,
        server_hint: Option<&str>,
        jitter_ms: f64,
    ) -> Duration {
        if let Some(hint) = server_hint.and_then(parse_seconds) {
            return hint.min(self.max);
        }

        let max_ms = self.max.as_millis() as f64;
        let exp = 2f64.powi(attempt.min(64) as i32);
        let delay_ms = (self.initial.as_millis() as f64 * exp + jitter_ms).min(max_ms);

        Duration::from_micros((delay_ms.max(0.0) * 1000.0).round() as u64)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(300),
            max: Duration::from_millis(3000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff() -> ExponentialBackoff {
        ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(10))
    }

    #[test]
    fn test_exponential_backoff() {
        let backoff = backoff();

        assert_eq!(backoff.delay_with_jitter(0, None, 0.0), Duration::from_millis(100));
        assert_eq!(backoff.delay_with_jitter(1, None, 0.0), Duration::from_millis(200));
        assert_eq!(backoff.delay_with_jitter(2, None, 0.0), Duration::from_millis(400));
        assert_eq!(backoff.delay_with_jitter(3, None, 0.0), Duration::from_millis(800));
        assert_eq!(backoff.delay_with_jitter(0, None, 50.0), Duration::from_millis(150));
    }

    #[test]
    fn test_exponential_backoff_max() {
        let backoff =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_millis(500));

        assert_eq!(backoff.delay_with_jitter(10, None, 99.0), Duration::from_millis(500));
        assert_eq!(backoff.delay_with_jitter(u32::MAX, None, 0.0), Duration::from_millis(500));
    }

    #[test]
    fn test_server_hint_precedence() {
        let backoff = backoff();

        assert_eq!(backoff.delay_with_jitter(3, Some("0"), 99.0), Duration::ZERO);
        assert_eq!(backoff.delay_with_jitter(0, Some("2"), 99.0), Duration::from_secs(2));
        assert_eq!(backoff.delay_with_jitter(0, Some("60"), 0.0), Duration::from_secs(10));
    }

    #[test]
    fn test_unparsable_hint_falls_back() {
        let backoff = backoff();

        assert_eq!(
            backoff.delay_with_jitter(1, Some("later"), 0.0),
            Duration::from_millis(200)
        );
        assert_eq!(backoff.delay_with_jitter(1, Some("-5"), 0.0), Duration::from_millis(200));
    }

    #[test]
    fn test_jitter_bounds() {
        let backoff = backoff();
        for _ in 0..100 {
            let delay = backoff.delay_for(0, None);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay < Duration::from_millis(200));
        }
    }

    #[test]
    fn test_default_schedule() {
        let backoff = ExponentialBackoff::default();
        assert_eq!(backoff.initial(), Duration::from_millis(300));
        assert_eq!(backoff.max(), Duration::from_millis(3000));
    }
}
