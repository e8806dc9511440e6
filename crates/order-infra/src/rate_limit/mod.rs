//! Rate limiting implementations.

mod limiter;
mod store;

pub use limiter::{FixedWindowRateLimiter, RateLimitConfig};
pub use store::{ClientRecord, ClientWindowStore, Decision, WindowConfig};
