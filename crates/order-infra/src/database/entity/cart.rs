//! Cart entity for SeaORM.
//!
//! Line items are embedded as a JSONB document so the whole aggregate is read
//! and written in one row.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use order_core::domain::{Cart, CartItem};
use order_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub customer_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub total_items: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Cart {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let items: Vec<CartItem> = serde_json::from_value(model.items)
            .map_err(|e| RepoError::Decode(format!("cart {}: {}", model.id, e)))?;
        let total_items = u32::try_from(model.total_items)
            .map_err(|e| RepoError::Decode(format!("cart {}: {}", model.id, e)))?;

        Ok(Self {
            id: Some(model.id),
            customer_id: model.customer_id,
            items,
            total_items,
            total_price: model.total_price,
        })
    }
}

/// Build a fully-set active model for `cart` stored under `id`.
pub fn to_active_model(id: Uuid, cart: &Cart) -> Result<ActiveModel, RepoError> {
    let items = serde_json::to_value(&cart.items).map_err(|e| RepoError::Decode(e.to_string()))?;
    let total_items = i32::try_from(cart.total_items)
        .map_err(|_| RepoError::Constraint("cart holds too many items".to_string()))?;

    Ok(ActiveModel {
        id: Set(id),
        customer_id: Set(cart.customer_id.clone()),
        items: Set(items),
        total_items: Set(total_items),
        total_price: Set(cart.total_price),
    })
}
