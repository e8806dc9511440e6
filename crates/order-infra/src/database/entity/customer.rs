//! Customer entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub password_hash: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for order_core::domain::Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            password_hash: model.password_hash,
        }
    }
}

impl From<order_core::domain::Customer> for ActiveModel {
    fn from(customer: order_core::domain::Customer) -> Self {
        Self {
            id: Set(customer.id),
            name: Set(customer.name),
            email: Set(customer.email),
            phone: Set(customer.phone),
            password_hash: Set(customer.password_hash),
        }
    }
}
