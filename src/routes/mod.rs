//! HTTP handlers, one module per service.

pub mod cart;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;
