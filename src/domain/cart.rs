//! Cart aggregate.
//!
//! One cart per user. Line items are keyed by product id; adding a
//! product already in the cart merges quantities while keeping the unit
//! price captured at first add. The total is recomputed on every
//! mutation, together with the timestamp, so it is never stored stale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Merging would push a line item's quantity past `u32::MAX`.
#[derive(Debug, Error)]
#[error("quantity exceeds representable range")]
pub struct QuantityOverflow;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cart {
    id: Uuid,
    user_id: Uuid,
    items: Vec<CartLineItem>,
    total: Decimal,
    updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub price: Decimal,
}

impl CartLineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl Cart {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            items: vec![],
            total: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Rehydrate a cart from its persisted parts.
    pub fn from_stored(
        id: Uuid,
        user_id: Uuid,
        items: Vec<CartLineItem>,
        total: Decimal,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self { id, user_id, items, total, updated_at }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merge `quantity` of a product into the cart at `unit_price`. If
    /// the product is already present only its quantity grows; the
    /// price snapshot from the first add is honored. Fails, leaving the
    /// cart untouched, if the merged quantity would overflow.
    pub fn add_item(
        &mut self,
        product_id: Uuid,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<(), QuantityOverflow> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            existing.quantity = existing.quantity.checked_add(quantity).ok_or(QuantityOverflow)?;
        } else {
            self.items.push(CartLineItem { product_id, quantity, price: unit_price });
        }
        self.recalculate();
        Ok(())
    }

    /// Drop the line item for `product_id`. Removing a product that is
    /// not in the cart is a no-op, not an error.
    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
        self.recalculate();
    }

    fn recalculate(&mut self) {
        self.total = self.items.iter().map(CartLineItem::line_total).sum();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_merges_and_keeps_first_price() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p, 2, dec!(10.00)).unwrap();
        cart.add_item(p, 3, dec!(12.50)).unwrap(); // later catalog price is ignored
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].price, dec!(10.00));
        assert_eq!(cart.total(), dec!(50.00));
    }

    #[test]
    fn test_total_invariant_across_operations() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, 2, dec!(10.00)).unwrap();
        assert_eq!(cart.total(), dec!(20.00));
        cart.add_item(p2, 1, dec!(5.00)).unwrap();
        assert_eq!(cart.total(), dec!(25.00));
        cart.remove_item(p1);
        assert_eq!(cart.total(), dec!(5.00));
        cart.remove_item(p2);
        assert_eq!(cart.total(), Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_product_is_noop() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p, 2, dec!(10.00)).unwrap();
        let before = cart.items().to_vec();
        cart.remove_item(Uuid::new_v4());
        assert_eq!(cart.items(), &before[..]);
        assert_eq!(cart.total(), dec!(20.00));
    }

    #[test]
    fn test_merge_overflow_rejected() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p, u32::MAX, dec!(1.00)).unwrap();
        assert!(cart.add_item(p, 1, dec!(1.00)).is_err());
        // the failed merge leaves the cart untouched
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, u32::MAX);
        assert_eq!(cart.total(), Decimal::from(u32::MAX) * dec!(1.00));
    }

    #[test]
    fn test_new_cart_is_empty_with_zero_total() {
        let cart = Cart::new(Uuid::new_v4());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
