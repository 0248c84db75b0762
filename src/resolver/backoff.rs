//! Linear backoff for rate-limited provider calls.
//!
//! # Overview
//!
//! When the provider throttles a call, [`BackoffPolicy`] decides whether the
//! resolver may try again and how long it waits first. Waits grow linearly
//! with the attempt number:
//!
//! ```text
//! wait = base_wait * attempt
//! ```
//!
//! With defaults (3 attempts, 30 s base) a query is tried at most three
//! times, waiting 30 s after the first throttled attempt and 60 s after the
//! second. A third throttled attempt ends the query after a 90 s cooldown, so
//! the next query does not hit the provider while it is still throttling.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use akakce_search_core::resolver::{BackoffDecision, BackoffPolicy};
//!
//! let policy = BackoffPolicy::default();
//! assert_eq!(policy.next_wait(2), Duration::from_secs(60));
//!
//! match policy.decide(3) {
//!     BackoffDecision::Retry { wait, next_attempt } => {
//!         println!("retrying in {wait:?} (attempt {next_attempt})");
//!     }
//!     BackoffDecision::GiveUp { attempts, cooldown } => {
//!         println!("giving up after {attempts} attempts, cooling down {cooldown:?}");
//!     }
//! }
//! ```

use std::time::Duration;

/// Default maximum attempts per query, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base wait multiplied by the attempt number.
pub const DEFAULT_BASE_WAIT: Duration = Duration::from_secs(30);

/// Decision after a throttled attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffDecision {
    /// Wait, then make attempt `next_attempt`.
    Retry {
        /// How long to wait before retrying.
        wait: Duration,
        /// The attempt number that follows the wait (1-based).
        next_attempt: u32,
    },

    /// Stop after waiting `cooldown`; the query is unresolved.
    GiveUp {
        /// Attempts made.
        attempts: u32,
        /// Wait before the caller moves on.
        cooldown: Duration,
    },
}

/// Retry eligibility and wait calculation for throttled attempts.
///
/// Holds no per-query state: the attempt counter lives in the caller and is
/// discarded when a resolve call ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,

    /// Wait after attempt 1; attempt `n` waits `n` times this.
    base_wait: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_wait: DEFAULT_BASE_WAIT,
        }
    }
}

impl BackoffPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, base_wait: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_wait,
        }
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the base wait.
    #[must_use]
    pub fn base_wait(&self) -> Duration {
        self.base_wait
    }

    /// Wait to apply after throttled attempt `attempt` (1-based).
    #[must_use]
    pub fn next_wait(&self, attempt: u32) -> Duration {
        self.base_wait.saturating_mul(attempt)
    }

    /// True while `attempt` is below the attempt limit.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Combines [`should_retry`](Self::should_retry) and
    /// [`next_wait`](Self::next_wait) for throttled attempt `attempt`.
    #[must_use]
    pub fn decide(&self, attempt: u32) -> BackoffDecision {
        if self.should_retry(attempt) {
            BackoffDecision::Retry {
                wait: self.next_wait(attempt),
                next_attempt: attempt + 1,
            }
        } else {
            BackoffDecision::GiveUp {
                attempts: attempt,
                cooldown: self.next_wait(attempt),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_policy_default_values() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_wait(), Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_policy_max_attempts_minimum_is_one() {
        let policy = BackoffPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(1));
    }

    #[test]
    fn test_next_wait_is_linear_in_attempt() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.next_wait(1), Duration::from_secs(30));
        assert_eq!(policy.next_wait(2), Duration::from_secs(60));
        assert_eq!(policy.next_wait(3), Duration::from_secs(90));
    }

    #[test]
    fn test_next_wait_custom_base() {
        let policy = BackoffPolicy::new(5, Duration::from_millis(250));
        assert_eq!(policy.next_wait(4), Duration::from_secs(1));
    }

    #[test]
    fn test_should_retry_respects_max_attempts() {
        let policy = BackoffPolicy::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[test]
    fn test_decide_retry_then_give_up() {
        let policy = BackoffPolicy::default();
        assert_eq!(
            policy.decide(1),
            BackoffDecision::Retry {
                wait: Duration::from_secs(30),
                next_attempt: 2
            }
        );
        assert_eq!(
            policy.decide(2),
            BackoffDecision::Retry {
                wait: Duration::from_secs(60),
                next_attempt: 3
            }
        );
        assert_eq!(
            policy.decide(3),
            BackoffDecision::GiveUp {
                attempts: 3,
                cooldown: Duration::from_secs(90)
            }
        );
    }

    #[test]
    fn test_policy_is_pure() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.decide(2), policy.decide(2));
        assert_eq!(policy.next_wait(2), policy.next_wait(2));
    }
}
