//! In-memory stores - the fallback when `DATABASE_URL` is not set.

mod cart_store;
mod repository;

pub use cart_store::InMemoryCartStore;
pub use repository::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
    InMemoryRepository, Keyed,
};
