//! PostgreSQL persistence via SeaORM.

mod cart_store;
mod connections;
mod postgres_base;

pub mod entity;
pub mod postgres_repo;

pub use cart_store::PostgresCartStore;
pub use connections::{DatabaseConfig, DatabaseConnections};
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{
    PostgresCustomerRepository, PostgresOrderRepository, PostgresProductRepository,
};
