//! Schema for customers, products, orders and carts.

pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_customers;
mod m20250601_000002_create_products;
mod m20250601_000003_create_orders;
mod m20250601_000004_create_carts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_customers::Migration),
            Box::new(m20250601_000002_create_products::Migration),
            Box::new(m20250601_000003_create_orders::Migration),
            Box::new(m20250601_000004_create_carts::Migration),
        ]
    }
}
