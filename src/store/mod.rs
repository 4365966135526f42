//! Persistence layer. Each module owns one collection and takes an
//! explicitly injected executor, so handlers can run several writes
//! inside a single transaction.

pub mod carts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;
