//! SeaORM entities and their conversions to domain types.

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;
