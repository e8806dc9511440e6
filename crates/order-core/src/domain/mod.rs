//! Domain entities - the core business objects.

mod cart;
mod customer;
mod order;
mod product;

pub use cart::{Cart, CartItem, recompute_totals};
pub use customer::{Customer, CustomerInput};
pub use order::{Order, OrderInput};
pub use product::{Product, ProductInput};
