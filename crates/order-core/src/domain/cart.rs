use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CartError;

/// A single line in a customer's cart.
///
/// `unit_price` is a snapshot of the product price taken when the line was
/// added or last updated; it does not follow later catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, CartError> {
        Ok(Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
            quantity,
            subtotal: line_total(unit_price, quantity)?,
        })
    }

    fn reprice(&mut self, unit_price: Decimal, quantity: u32) -> Result<(), CartError> {
        self.subtotal = line_total(unit_price, quantity)?;
        self.unit_price = unit_price;
        self.quantity = quantity;
        Ok(())
    }
}

fn line_total(unit_price: Decimal, quantity: u32) -> Result<Decimal, CartError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(CartError::QuantityTooLarge)
}

/// Cart aggregate - one per customer.
///
/// `total_items` and `total_price` are derived from `items` and are rewritten
/// by every mutator below. A mutator that fails leaves the cart untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub customer_id: String,
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: Decimal,
}

/// Sum quantities and line prices.
pub fn recompute_totals(items: &[CartItem]) -> Result<(u32, Decimal), CartError> {
    items
        .iter()
        .try_fold((0u32, Decimal::ZERO), |(count, price), item| {
            let line = item.unit_price.checked_mul(Decimal::from(item.quantity))?;
            Some((count.checked_add(item.quantity)?, price.checked_add(line)?))
        })
        .ok_or(CartError::QuantityTooLarge)
}

impl Cart {
    /// Create an unsaved cart holding exactly one item.
    pub fn with_item(customer_id: impl Into<String>, item: CartItem) -> Result<Self, CartError> {
        let mut cart = Self {
            id: None,
            customer_id: customer_id.into(),
            items: Vec::new(),
            total_items: 0,
            total_price: Decimal::ZERO,
        };
        cart.commit(vec![item])?;
        Ok(cart)
    }

    pub fn find_item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add `item` to the cart. An existing line for the same product has its
    /// quantity increased and is repriced at the incoming unit price.
    pub fn merge_item(&mut self, item: CartItem) -> Result<(), CartError> {
        let mut items = self.items.clone();
        match items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => {
                let quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartError::QuantityTooLarge)?;
                existing.reprice(item.unit_price, quantity)?;
            }
            None => items.push(item),
        }
        self.commit(items)
    }

    /// Overwrite the quantity of an existing line. Returns `Ok(false)` when the
    /// product is not in the cart; the cart is left untouched in that case.
    pub fn set_item_quantity(
        &mut self,
        product_id: &str,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<bool, CartError> {
        let mut items = self.items.clone();
        let Some(existing) = items.iter_mut().find(|i| i.product_id == product_id) else {
            return Ok(false);
        };
        existing.reprice(unit_price, quantity)?;
        self.commit(items)?;
        Ok(true)
    }

    /// Drop the line for `product_id`. Returns `Ok(false)` if nothing matched.
    pub fn remove_item(&mut self, product_id: &str) -> Result<bool, CartError> {
        let mut items = self.items.clone();
        items.retain(|i| i.product_id != product_id);
        if items.len() == self.items.len() {
            return Ok(false);
        }
        self.commit(items)?;
        Ok(true)
    }

    fn commit(&mut self, items: Vec<CartItem>) -> Result<(), CartError> {
        let (total_items, total_price) = recompute_totals(&items)?;
        self.items = items;
        self.total_items = total_items;
        self.total_price = total_price;
        Ok(())
    }
}
