//! # Order Core
//!
//! The domain layer of the order management service: entities, the cart
//! aggregate rules, the ports infrastructure must implement, and the services
//! that drive them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{CartError, DomainError, RepoError};
