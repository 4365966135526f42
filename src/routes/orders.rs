//! Order endpoints.
//!
//! Checkout is the cart→order handoff: snapshot the cart into an
//! immutable order and delete the cart, both inside one transaction so
//! no reader ever observes an order without its cart cleared (or the
//! reverse, after a crash).

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::domain::{Cart, Order};
use crate::error::{ApiError, Result};
use crate::store::{carts, orders, products};
use crate::AppState;

/// Checkout requires a cart with at least one line item. The guard
/// runs before anything is written, so a rejected checkout creates no
/// order.
fn require_checkout_ready(cart: Option<Cart>) -> Result<Cart> {
    cart.filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::invalid_state("Cart is empty"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub shipping_address: String,
}

pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut tx = state.db.begin().await?;
    let cart = require_checkout_ready(carts::find_for_update(&mut *tx, user.id).await?)?;

    // Snapshot display names; products deleted since add-time drop out
    // of the order.
    let mut product_names = HashMap::new();
    for line in cart.items() {
        if let Some(product) = products::find(&mut *tx, line.product_id).await? {
            product_names.insert(product.id, product.name);
        }
    }

    let order = Order::from_cart(&cart, &product_names, req.shipping_address);
    orders::insert(&mut *tx, &order).await?;
    carts::delete(&mut *tx, user.id).await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id(), total = %order.total(), "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = orders::list_for_user(&state.db, user.id).await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>> {
    orders::find_for_user(&state.db, id, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checkout_missing_cart_rejected() {
        let err = require_checkout_ready(None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }

    #[test]
    fn test_checkout_empty_cart_rejected() {
        let err = require_checkout_ready(Some(Cart::new(Uuid::new_v4()))).unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }

    #[test]
    fn test_checkout_ready_cart_passes() {
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(Uuid::new_v4(), 1, dec!(10.00)).unwrap();
        let cart = require_checkout_ready(Some(cart)).unwrap();
        assert_eq!(cart.items().len(), 1);
    }
}
