//! Per-endpoint retry budget and delay.

use std::time::Duration;

/// Retry budget attached to each endpoint transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Fixed pause before every retry at the same endpoint.
    pub delay: Duration,
    /// HTTP statuses worth another attempt at the same endpoint.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1_000),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            delay,
            ..Self::default()
        }
    }

    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Delay before retry number `retry` (0-based). Constant across retries.
    pub fn delay_for_retry(&self, _retry: u32) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_three_retries_one_second_apart() {
        let config = RetryConfig::default();

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.total_attempts(), 4);
        assert_eq!(config.delay_for_retry(0), Duration::from_millis(1_000));
        assert_eq!(config.delay_for_retry(2), Duration::from_millis(1_000));
    }

    #[test]
    fn retryable_statuses_exclude_client_errors() {
        let config = RetryConfig::default();

        for status in [408, 429, 500, 502, 503, 504] {
            assert!(config.should_retry_status(status), "status {status}");
        }
        assert!(!config.should_retry_status(400));
        assert!(!config.should_retry_status(401));
        assert!(!config.should_retry_status(404));
    }

    #[test]
    fn zero_retries_means_single_attempt() {
        let config = RetryConfig::fixed(Duration::ZERO, 0);

        assert_eq!(config.total_attempts(), 1);
        assert_eq!(config.delay_for_retry(0), Duration::ZERO);
    }

    #[test]
    fn attempt_count_saturates_instead_of_overflowing() {
        assert_eq!(RetryConfig::fixed(Duration::ZERO, u32::MAX).total_attempts(), u32::MAX);
    }
}
