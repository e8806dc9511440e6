//! # Order Infrastructure
//!
//! Concrete implementations of the ports defined in `order-core`: the
//! fixed-window rate limiter, caches, in-memory stores and the PostgreSQL
//! repositories.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod cache;
pub mod memory;
pub mod rate_limit;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use cache::InMemoryCache;
pub use memory::{
    InMemoryCartStore, InMemoryCustomerRepository, InMemoryOrderRepository,
    InMemoryProductRepository,
};
pub use rate_limit::{ClientWindowStore, FixedWindowRateLimiter, RateLimitConfig, WindowConfig};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresCartStore, PostgresCustomerRepository,
    PostgresOrderRepository, PostgresProductRepository,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
