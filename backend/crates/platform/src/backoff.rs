//! Bounded exponential backoff
//!
//! `delay(n) = min(initial * factor^n, max_delay)` for `n < max_retries`,
//! after which the caller gives up.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    pub initial: Duration,
    pub factor: u32,
    pub max_delay: Duration,
    /// Retries after the first attempt; 0 disables retrying
    pub max_retries: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(5),
            factor: 2,
            max_delay: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

impl Backoff {
    /// Same delay before every retry
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            initial: delay,
            factor: 1,
            max_delay: delay,
            max_retries,
        }
    }

    /// Delay before retry number `retry` (0-based), or `None` once exhausted
    pub fn delay(&self, retry: u32) -> Option<Duration> {
        if retry >= self.max_retries {
            return None;
        }

        let multiplier = self.factor.max(1).saturating_pow(retry);
        Some(self.initial.saturating_mul(multiplier).min(self.max_delay))
    }

    /// Sleep before retry number `retry`. Returns `false` when exhausted.
    pub async fn wait(&self, retry: u32) -> bool {
        match self.delay(retry) {
            Some(delay) => {
                tracing::debug!(retry, delay_ms = delay.as_millis() as u64, "Backing off");
                tokio::time::sleep(delay).await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_grows_and_caps() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(0), Some(Duration::from_secs(5)));
        assert_eq!(backoff.delay(1), Some(Duration::from_secs(10)));
        assert_eq!(backoff.delay(2), Some(Duration::from_secs(20)));
        assert_eq!(backoff.delay(3), None);

        let long = Backoff {
            max_retries: 10,
            ..Backoff::default()
        };
        assert_eq!(long.delay(3), Some(Duration::from_secs(30)));
        assert_eq!(long.delay(9), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_fixed_and_disabled() {
        let fixed = Backoff::fixed(Duration::from_secs(5), 1);
        assert_eq!(fixed.delay(0), Some(Duration::from_secs(5)));
        assert_eq!(fixed.delay(1), None);

        let none = Backoff {
            max_retries: 0,
            ..Backoff::default()
        };
        assert_eq!(none.delay(0), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_delay() {
        let backoff = Backoff::fixed(Duration::from_secs(5), 1);
        let start = tokio::time::Instant::now();

        assert!(backoff.wait(0).await);
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert!(start.elapsed() < Duration::from_secs(6));
        assert!(!backoff.wait(1).await);
    }
}
