use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order entity - a placed order referencing catalog products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order stamped with the current time.
    pub fn new(input: OrderInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            product_ids: input.product_ids,
            total_amount: input.total_amount,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update; empty or non-positive fields are ignored.
    pub fn apply(&mut self, input: OrderInput) {
        if !input.customer_id.is_empty() {
            self.customer_id = input.customer_id;
        }
        if !input.product_ids.is_empty() {
            self.product_ids = input.product_ids;
        }
        if input.total_amount > Decimal::ZERO {
            self.total_amount = input.total_amount;
        }
    }
}

/// Fields accepted when creating or updating an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderInput {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub total_amount: Decimal,
}
