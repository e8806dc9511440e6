//! In-memory entity repositories - used when no database is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use order_core::domain::{Customer, Order, Product};
use order_core::error::RepoError;
use order_core::ports::{BaseRepository, CustomerRepository, OrderRepository, ProductRepository};

/// Entities that carry their own primary key.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Customer {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Product {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Order {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Insertion-ordered in-memory repository.
pub struct InMemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> BaseRepository<T, Uuid> for InMemoryRepository<T>
where
    T: Keyed + Clone + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.key() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        Ok(self.rows.read().await.clone())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.key() == entity.key()) {
            Some(existing) => *existing = entity.clone(),
            None => rows.push(entity.clone()),
        }
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.key() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

pub type InMemoryCustomerRepository = InMemoryRepository<Customer>;
pub type InMemoryProductRepository = InMemoryRepository<Product>;
pub type InMemoryOrderRepository = InMemoryRepository<Order>;

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.email == email).cloned())
    }
}

impl ProductRepository for InMemoryProductRepository {}

impl OrderRepository for InMemoryOrderRepository {}
