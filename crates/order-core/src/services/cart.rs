//! Cart use cases.
//!
//! Every operation re-reads the customer's cart from the store, mutates it in
//! memory and writes the whole document back. Calls for the same customer are
//! serialized by an in-process lock so concurrent adds cannot overwrite each
//! other; separate processes sharing one store can still race.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::{Cart, CartItem, Product};
use crate::error::{CartError, RepoError};
use crate::ports::{CartStore, ProductRepository};

/// Item payload for add and update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
}

/// What `clear_cart` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    AlreadyEmpty,
}

pub struct CartService {
    carts: Arc<dyn CartStore>,
    products: Arc<dyn ProductRepository>,
    locks: CustomerLocks,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartStore>, products: Arc<dyn ProductRepository>) -> Self {
        Self {
            carts,
            products,
            locks: CustomerLocks::default(),
        }
    }

    /// Add an item, creating the cart on first use. Adding a product that is
    /// already in the cart increases its quantity.
    pub async fn add_to_cart(
        &self,
        customer_id: &str,
        input: CartItemInput,
    ) -> Result<Cart, CartError> {
        ensure_quantity(input.quantity)?;
        let product = self.lookup_product(&input.product_id).await?;
        let name = if input.product_name.is_empty() {
            product.name
        } else {
            input.product_name
        };
        let item = CartItem::new(input.product_id, name, product.price, input.quantity)?;

        let _guard = self.locks.acquire(customer_id).await;

        match self.carts.find_by_customer_id(customer_id).await? {
            None => {
                let mut cart = Cart::with_item(customer_id, item)?;
                let id = self.carts.insert(&cart).await?;
                cart.id = Some(id);
                tracing::info!(customer_id = %customer_id, cart_id = %id, "Cart created");
                Ok(cart)
            }
            Some(mut cart) => {
                let id = stored_id(&cart)?;
                cart.merge_item(item)?;
                self.carts.replace_by_id(id, &cart).await?;
                tracing::debug!(customer_id = %customer_id, items = cart.items.len(), "Cart updated");
                Ok(cart)
            }
        }
    }

    pub async fn get_cart_by_customer_id(&self, customer_id: &str) -> Result<Cart, CartError> {
        self.carts
            .find_by_customer_id(customer_id)
            .await?
            .ok_or(CartError::CartNotFound)
    }

    /// Set the quantity of an item already in the cart. Never inserts.
    pub async fn update_cart_item(
        &self,
        customer_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        ensure_quantity(quantity)?;
        let _guard = self.locks.acquire(customer_id).await;

        let mut cart = self.get_cart_by_customer_id(customer_id).await?;
        if cart.find_item(product_id).is_none() {
            return Err(CartError::ItemNotFound(product_id.to_string()));
        }
        let product = self.lookup_product(product_id).await?;
        let id = stored_id(&cart)?;

        cart.set_item_quantity(product_id, product.price, quantity)?;
        self.carts.replace_by_id(id, &cart).await?;
        Ok(cart)
    }

    pub async fn remove_cart_item(
        &self,
        customer_id: &str,
        product_id: &str,
    ) -> Result<Cart, CartError> {
        let _guard = self.locks.acquire(customer_id).await;

        let mut cart = self.get_cart_by_customer_id(customer_id).await?;
        let id = stored_id(&cart)?;
        if !cart.remove_item(product_id)? {
            return Err(CartError::ItemNotFound(product_id.to_string()));
        }
        self.carts.replace_by_id(id, &cart).await?;
        Ok(cart)
    }

    /// Delete the cart document. Clearing a customer without a cart succeeds.
    pub async fn clear_cart(&self, customer_id: &str) -> Result<ClearOutcome, CartError> {
        let _guard = self.locks.acquire(customer_id).await;

        let deleted = self.carts.delete_by_customer_id(customer_id).await?;
        if deleted == 0 {
            tracing::info!(customer_id = %customer_id, "Cart already empty, nothing to clear");
            return Ok(ClearOutcome::AlreadyEmpty);
        }
        Ok(ClearOutcome::Cleared)
    }

    async fn lookup_product(&self, product_id: &str) -> Result<Product, CartError> {
        let not_found = || CartError::ProductNotFound(product_id.to_string());
        let id = Uuid::parse_str(product_id).map_err(|_| not_found())?;
        self.products.find_by_id(id).await?.ok_or_else(not_found)
    }
}

fn ensure_quantity(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }
    Ok(())
}

fn stored_id(cart: &Cart) -> Result<Uuid, CartError> {
    cart.id
        .ok_or_else(|| RepoError::Decode("stored cart has no id".to_string()).into())
}

/// One async mutex per customer with an outstanding cart operation.
#[derive(Default)]
struct CustomerLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CustomerLocks {
    async fn acquire(&self, customer_id: &str) -> CustomerGuard<'_> {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(customer_id.to_string()).or_default().clone()
        };
        let guard = mutex.lock_owned().await;

        CustomerGuard {
            locks: self,
            customer_id: customer_id.to_string(),
            _guard: guard,
        }
    }
}

struct CustomerGuard<'a> {
    locks: &'a CustomerLocks,
    customer_id: String,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for CustomerGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map and this guard reference the mutex: nobody is waiting.
        if map
            .get(&self.customer_id)
            .is_some_and(|m| Arc::strong_count(m) == 2)
        {
            map.remove(&self.customer_id);
        }
    }
}
