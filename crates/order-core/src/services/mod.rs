//! Application services.

mod cart;

pub use cart::{CartItemInput, CartService, ClearOutcome};
