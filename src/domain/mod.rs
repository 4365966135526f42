//! Domain aggregates.

pub mod cart;
pub mod order;
pub mod payment;

pub use cart::{Cart, CartLineItem, QuantityOverflow};
pub use order::{Order, OrderLineItem, OrderStatus};
pub use payment::{Payment, PaymentStatus};
