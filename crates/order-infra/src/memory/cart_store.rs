//! In-memory cart documents keyed by store-assigned id.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use order_core::domain::Cart;
use order_core::error::RepoError;
use order_core::ports::CartStore;

#[derive(Default)]
pub struct InMemoryCartStore {
    docs: RwLock<HashMap<Uuid, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<Cart>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.values().find(|c| c.customer_id == customer_id).cloned())
    }

    async fn insert(&self, cart: &Cart) -> Result<Uuid, RepoError> {
        let mut docs = self.docs.write().await;
        if docs.values().any(|c| c.customer_id == cart.customer_id) {
            return Err(RepoError::Constraint(format!(
                "cart for customer {} already exists",
                cart.customer_id
            )));
        }

        let id = Uuid::new_v4();
        let mut doc = cart.clone();
        doc.id = Some(id);
        docs.insert(id, doc);
        Ok(id)
    }

    async fn replace_by_id(&self, id: Uuid, cart: &Cart) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        let doc = docs.get_mut(&id).ok_or(RepoError::NotFound)?;
        *doc = Cart {
            id: Some(id),
            ..cart.clone()
        };
        Ok(())
    }

    async fn delete_by_customer_id(&self, customer_id: &str) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|_, c| c.customer_id != customer_id);
        Ok((before - docs.len()) as u64)
    }
}
