//! Bounded exponential backoff for Gemini HTTP calls.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;

/// Retry schedule applied to throttled or transiently failing requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
    /// Upper bound on the computed delay (before jitter).
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Build a policy with the given attempt budget and default delays.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Backoff delay before retrying after `attempt` failed attempts.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let scaled = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(exponent));
        scaled.min(self.max_delay) + jitter()
    }
}

/// Status codes worth retrying: rate limiting and server-side failures.
pub(crate) fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Small random-ish delay spreading retries from concurrent runs apart.
fn jitter() -> Duration {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or(0);
    Duration::from_millis(u64::from(nanos % 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_grow_exponentially_up_to_the_cap() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        let jitter_allowance = Duration::from_millis(100);

        let first = policy.delay_for(1);
        assert!(first >= Duration::from_millis(100));
        assert!(first < Duration::from_millis(100) + jitter_allowance);

        let second = policy.delay_for(2);
        assert!(second >= Duration::from_millis(200));

        let capped = policy.delay_for(10);
        assert!(capped < Duration::from_millis(350) + jitter_allowance);
    }

    #[test]
    fn retryable_statuses_are_throttle_and_server_errors() {
        assert!(retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!retryable_status(StatusCode::BAD_REQUEST));
        assert!(!retryable_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn attempt_budget_never_drops_below_one() {
        let policy = RetryPolicy::with_max_attempts(0);
        assert_eq!(policy.max_attempts, 1);
    }
}
