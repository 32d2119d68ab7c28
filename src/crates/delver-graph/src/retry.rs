//! Retry policies - exponential backoff for transient failures
//!
//! A [`RetryPolicy`] defines how many times an operation may be attempted and
//! how long to wait between attempts. Delays grow exponentially from
//! `initial_interval` by `backoff_factor` per attempt, capped at
//! `max_interval`, with optional jitter to spread retries from concurrent
//! runs.
//!
//! Policies describe *when* to retry; *what* to retry is the caller's call.
//! The retrieval adapter, the main consumer, retries only transient provider
//! failures and re-raises everything else immediately:
//!
//! ```rust,ignore
//! let policy = RetryPolicy::retrieval();
//! let mut attempt = 0;
//! loop {
//!     match provider.search(&query, depth).await {
//!         Ok(response) => break Ok(response),
//!         Err(e) if e.is_transient() && policy.should_retry(attempt + 1) => {
//!             tokio::time::sleep(policy.calculate_delay(attempt)).await;
//!             attempt += 1;
//!         }
//!         Err(e) => break Err(e), // original error, unchanged
//!     }
//! }
//! ```

use rand::Rng;
use std::time::Duration;

/// Configuration for retrying failed operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: usize,

    /// Initial interval between retries in seconds
    pub initial_interval: f64,

    /// Multiplier applied to the interval after each retry
    pub backoff_factor: f64,

    /// Maximum interval between retries in seconds
    pub max_interval: f64,

    /// Whether to add random jitter to intervals
    pub jitter: bool,
}

impl RetryPolicy {
    /// Create a new retry policy with the given max attempts.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            initial_interval: 0.5,
            backoff_factor: 2.0,
            max_interval: 128.0,
            jitter: true,
        }
    }

    /// The policy wrapping retrieval calls: 3 attempts total, waits growing
    /// from 2s and capped at 10s, no jitter so delays stay reproducible.
    pub fn retrieval() -> Self {
        Self::new(3)
            .with_initial_interval(2.0)
            .with_max_interval(10.0)
            .with_jitter(false)
    }

    /// Set the initial interval between retries.
    pub fn with_initial_interval(mut self, seconds: f64) -> Self {
        self.initial_interval = seconds;
        self
    }

    /// Set the backoff factor.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the maximum interval between retries.
    pub fn with_max_interval(mut self, seconds: f64) -> Self {
        self.max_interval = seconds;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Uses exponential backoff: `initial_interval * backoff_factor ^ attempt`,
    /// capped at `max_interval`, with optional jitter (0.5x to 1.5x).
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        if attempt >= self.max_attempts {
            return Duration::from_secs(0);
        }

        let base_delay = self.initial_interval * self.backoff_factor.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_interval);

        let final_delay = if self.jitter {
            let mut rng = rand::thread_rng();
            capped_delay * rng.gen_range(0.5..=1.5)
        } else {
            capped_delay
        };

        Duration::from_secs_f64(final_delay)
    }

    /// Check if another attempt is allowed.
    pub fn should_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_factor, 2.0);
        assert!(policy.jitter);
    }

    #[test]
    fn test_retrieval_policy_delay_schedule() {
        let policy = RetryPolicy::retrieval();
        assert_eq!(policy.max_attempts, 3);
        assert!(!policy.jitter);

        // 2s, 4s - the third attempt is the last, no delay after it.
        assert_eq!(policy.calculate_delay(0), Duration::from_secs(2));
        assert_eq!(policy.calculate_delay(1), Duration::from_secs(4));
    }

    #[test]
    fn test_exponential_growth_and_cap() {
        let policy = RetryPolicy::new(10)
            .with_initial_interval(2.0)
            .with_backoff_factor(2.0)
            .with_max_interval(10.0)
            .with_jitter(false);

        assert_eq!(policy.calculate_delay(0).as_secs_f64(), 2.0);
        assert_eq!(policy.calculate_delay(1).as_secs_f64(), 4.0);
        assert_eq!(policy.calculate_delay(2).as_secs_f64(), 8.0);
        // 16s exceeds the cap
        assert_eq!(policy.calculate_delay(3).as_secs_f64(), 10.0);
        assert_eq!(policy.calculate_delay(7).as_secs_f64(), 10.0);
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let policy = RetryPolicy::new(5)
            .with_initial_interval(1.0)
            .with_backoff_factor(2.0)
            .with_jitter(true);

        let base = 4.0; // 1.0 * 2^2
        for _ in 0..20 {
            let delay = policy.calculate_delay(2).as_secs_f64();
            assert!((base * 0.5..=base * 1.5).contains(&delay));
        }
    }

    #[test]
    fn test_should_retry_boundary() {
        let policy = RetryPolicy::new(3);
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_no_delay_past_max_attempts() {
        let policy = RetryPolicy::new(2).with_jitter(false);
        assert_eq!(policy.calculate_delay(5), Duration::from_secs(0));
    }
}
