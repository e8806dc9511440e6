//! Cart documents persisted as JSONB rows.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use order_core::domain::Cart;
use order_core::error::RepoError;
use order_core::ports::CartStore;

use super::entity::cart::{self, Entity as CartEntity, to_active_model};
use super::postgres_base::write_error;

pub struct PostgresCartStore {
    db: DbConn,
}

impl PostgresCartStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<Cart>, RepoError> {
        let row = CartEntity::find()
            .filter(cart::Column::CustomerId.eq(customer_id))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        row.map(Cart::try_from).transpose()
    }

    async fn insert(&self, cart: &Cart) -> Result<Uuid, RepoError> {
        let id = Uuid::new_v4();
        let model = to_active_model(id, cart)?
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        tracing::debug!(cart_id = %model.id, customer_id = %model.customer_id, "Cart inserted");
        Ok(model.id)
    }

    async fn replace_by_id(&self, id: Uuid, cart: &Cart) -> Result<(), RepoError> {
        match to_active_model(id, cart)?.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(RepoError::NotFound),
            Err(e) => Err(write_error(e)),
        }
    }

    async fn delete_by_customer_id(&self, customer_id: &str) -> Result<u64, RepoError> {
        let result = CartEntity::delete_many()
            .filter(cart::Column::CustomerId.eq(customer_id))
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
