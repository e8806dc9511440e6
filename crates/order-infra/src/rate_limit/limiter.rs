//! Rate limiter backed by the in-process fixed-window store.

use std::sync::Arc;

use async_trait::async_trait;

use order_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::store::ClientWindowStore;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window.
    pub requests_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 3,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            requests_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
        }
    }
}

/// Per-client fixed-window limiter.
///
/// Limits are per-process, not distributed across instances. The store is
/// owned by the caller so several limiters, or the server's shutdown path,
/// can share it.
pub struct FixedWindowRateLimiter {
    store: Arc<ClientWindowStore>,
    config: RateLimitConfig,
}

impl FixedWindowRateLimiter {
    pub fn new(store: Arc<ClientWindowStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<ClientWindowStore> {
        &self.store
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let decision = self.store.admit(key, self.config.requests_per_minute);

        if !decision.allowed {
            tracing::warn!(
                client = %key,
                count = decision.count,
                retry_after_secs = decision.retry_after.as_secs(),
                "Rate limit exceeded"
            );
        }

        Ok(RateLimitResult {
            allowed: decision.allowed,
            count: decision.count,
            retry_after: decision.retry_after,
        })
    }
}
