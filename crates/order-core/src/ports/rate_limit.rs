//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Rate limiter trait - abstraction over rate limiting backends.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record a request for `key` and decide whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Requests counted for this key in the current window, this one included
    /// when it was allowed.
    pub count: u32,
    /// Time until the current window resets.
    pub retry_after: Duration,
}

impl RateLimitResult {
    /// Whole seconds to wait, rounded up so a denial never reports zero.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        if self.retry_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_rounds_up() {
        let result = RateLimitResult {
            allowed: false,
            count: 4,
            retry_after: Duration::from_millis(2_100),
        };
        assert_eq!(result.retry_after_secs(), 3);

        let exact = RateLimitResult {
            retry_after: Duration::from_secs(5),
            ..result
        };
        assert_eq!(exact.retry_after_secs(), 5);
    }
}
