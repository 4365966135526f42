//! Order aggregate.
//!
//! An order is an immutable snapshot of a cart at checkout. Each line
//! item copies the product's display name and the cart's price
//! snapshot; items whose product has since been deleted are dropped.
//! The total is recomputed from the finalized line items, so it always
//! equals the sum of what the order actually contains. Only the status
//! may change after creation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Cart;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderLineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    id: Uuid,
    user_id: Uuid,
    items: Vec<OrderLineItem>,
    total: Decimal,
    status: OrderStatus,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Snapshot a cart into a pending order. `product_names` holds the
    /// display names of the products that still exist in the catalog;
    /// cart lines without an entry are silently dropped.
    pub fn from_cart(
        cart: &Cart,
        product_names: &HashMap<Uuid, String>,
        shipping_address: impl Into<String>,
    ) -> Self {
        let items: Vec<OrderLineItem> = cart
            .items()
            .iter()
            .filter_map(|line| {
                product_names.get(&line.product_id).map(|name| OrderLineItem {
                    product_id: line.product_id,
                    product_name: name.clone(),
                    quantity: line.quantity,
                    price: line.price,
                })
            })
            .collect();
        let total = items.iter().map(OrderLineItem::line_total).sum();
        Self {
            id: Uuid::new_v4(),
            user_id: cart.user_id(),
            items,
            total,
            status: OrderStatus::Pending,
            shipping_address: shipping_address.into(),
            created_at: Utc::now(),
        }
    }

    /// Rehydrate an order from its persisted parts.
    pub fn from_stored(
        id: Uuid,
        user_id: Uuid,
        items: Vec<OrderLineItem>,
        total: Decimal,
        status: OrderStatus,
        shipping_address: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self { id, user_id, items, total, status, shipping_address, created_at }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn items(&self) -> &[OrderLineItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Cart;
    use rust_decimal_macros::dec;

    fn names(pairs: &[(Uuid, &str)]) -> HashMap<Uuid, String> {
        pairs.iter().map(|(id, n)| (*id, n.to_string())).collect()
    }

    #[test]
    fn test_snapshot_from_cart() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, 2, dec!(10.00)).unwrap();
        cart.add_item(p2, 1, dec!(5.00)).unwrap();

        let order = Order::from_cart(&cart, &names(&[(p1, "Widget"), (p2, "Gadget")]), "123 Main St");
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total(), dec!(25.00));
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.shipping_address(), "123 Main St");
        assert_eq!(order.user_id(), cart.user_id());
        assert_eq!(order.items()[0].product_name, "Widget");
    }

    #[test]
    fn test_deleted_product_dropped_and_total_recomputed() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, 2, dec!(10.00)).unwrap();
        cart.add_item(p2, 1, dec!(5.00)).unwrap();
        assert_eq!(cart.total(), dec!(25.00));

        // p2 vanished from the catalog between add and checkout
        let order = Order::from_cart(&cart, &names(&[(p1, "Widget")]), "123 Main St");
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.total(), dec!(20.00));
    }

    #[test]
    fn test_status_parse_roundtrip() {
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Pending));
        assert_eq!(OrderStatus::parse(OrderStatus::Paid.as_str()), Some(OrderStatus::Paid));
        assert_eq!(OrderStatus::parse("shipped"), None);
    }
}
