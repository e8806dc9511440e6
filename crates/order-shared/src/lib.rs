//! # Order Shared
//!
//! Wire types for the order management API, kept free of server dependencies
//! so clients can reuse them.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, MessageResponse, RateLimitResponse};
