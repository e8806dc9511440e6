//! Order entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: String,
    pub product_ids: Vec<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for order_core::domain::Order {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            product_ids: model.product_ids,
            total_amount: model.total_amount,
            created_at: model.created_at.into(),
        }
    }
}

impl From<order_core::domain::Order> for ActiveModel {
    fn from(order: order_core::domain::Order) -> Self {
        Self {
            id: Set(order.id),
            customer_id: Set(order.customer_id),
            product_ids: Set(order.product_ids),
            total_amount: Set(order.total_amount),
            created_at: Set(order.created_at.into()),
        }
    }
}
