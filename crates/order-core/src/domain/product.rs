use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product entity - a sellable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

impl Product {
    pub fn new(name: String, price: Decimal, stock: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            price,
            stock,
        }
    }

    /// Apply a partial update. Empty name, non-positive price and negative
    /// stock are ignored.
    pub fn apply(&mut self, input: ProductInput) {
        if !input.name.is_empty() {
            self.name = input.name;
        }
        if input.price > Decimal::ZERO {
            self.price = input.price;
        }
        if input.stock >= 0 {
            self.stock = input.stock;
        }
    }
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "unset_stock")]
    pub stock: i32,
}

fn unset_stock() -> i32 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_update() {
        let mut product = Product::new("Tea".into(), Decimal::new(450, 2), 10);

        product.apply(ProductInput {
            name: String::new(),
            price: Decimal::ZERO,
            stock: 0,
        });

        assert_eq!(product.name, "Tea");
        assert_eq!(product.price, Decimal::new(450, 2));
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_missing_stock_is_left_alone() {
        let input: ProductInput = serde_json::from_str(r#"{"price": "5.00"}"#).unwrap();
        let mut product = Product::new("Tea".into(), Decimal::new(450, 2), 10);

        product.apply(input);

        assert_eq!(product.price, Decimal::new(500, 2));
        assert_eq!(product.stock, 10);
    }
}
