//! Cart endpoints.
//!
//! Mutations run as a read-modify-write inside a transaction with the
//! cart row locked (`SELECT ... FOR UPDATE`), so two concurrent
//! requests against the same user's cart cannot lose each other's
//! update.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::domain::Cart;
use crate::error::{ApiError, Result};
use crate::store::{carts, products};
use crate::AppState;

/// Carts are created lazily: the first read persists an empty cart.
pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Cart>> {
    if let Some(cart) = carts::find(&state.db, user.id).await? {
        return Ok(Json(cart));
    }
    let cart = Cart::new(user.id);
    carts::upsert(&state.db, &cart).await?;
    Ok(Json(cart))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<serde_json::Value>> {
    req.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;

    let mut tx = state.db.begin().await?;
    let product = products::find(&mut *tx, req.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    let mut cart = carts::find_for_update(&mut *tx, user.id)
        .await?
        .unwrap_or_else(|| Cart::new(user.id));
    cart.add_item(product.id, req.quantity, product.price)
        .map_err(|_| ApiError::bad_request("Quantity too large"))?;
    carts::upsert(&mut *tx, &cart).await?;
    tx.commit().await?;

    Ok(Json(serde_json::json!({ "message": "Item added to cart" })))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let mut tx = state.db.begin().await?;
    let mut cart = carts::find_for_update(&mut *tx, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cart not found"))?;
    // removing a product that is not in the cart is a no-op
    cart.remove_item(product_id);
    carts::upsert(&mut *tx, &cart).await?;
    tx.commit().await?;

    Ok(Json(serde_json::json!({ "message": "Item removed from cart" })))
}
