use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Cart, Customer, Order, Product};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List every entity.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Customer repository with domain-specific methods.
#[async_trait]
pub trait CustomerRepository: BaseRepository<Customer, Uuid> {
    /// Find a customer by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepoError>;
}

/// Product repository. Doubles as the catalog the cart prices items from.
pub trait ProductRepository: BaseRepository<Product, Uuid> {}

/// Order repository.
pub trait OrderRepository: BaseRepository<Order, Uuid> {}

/// Cart persistence, keyed by customer.
///
/// Carts are stored as whole documents: there is no per-item update, every
/// change is written back with `replace_by_id`.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<Cart>, RepoError>;

    /// Insert a new cart and return the id the store assigned to it.
    async fn insert(&self, cart: &Cart) -> Result<Uuid, RepoError>;

    /// Overwrite the stored cart `id` with `cart`.
    async fn replace_by_id(&self, id: Uuid, cart: &Cart) -> Result<(), RepoError>;

    /// Delete the customer's cart, returning how many documents were removed.
    async fn delete_by_customer_id(&self, customer_id: &str) -> Result<u64, RepoError>;
}
