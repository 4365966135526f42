//! Cart persistence. One row per user; line items are embedded as
//! JSONB and the whole cart is replaced on every mutation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::domain::{Cart, CartLineItem};
use crate::error::Result;

#[derive(sqlx::FromRow)]
struct CartRow {
    user_id: Uuid,
    id: Uuid,
    items: serde_json::Value,
    total: Decimal,
    updated_at: DateTime<Utc>,
}

impl CartRow {
    fn into_cart(self) -> Result<Cart> {
        let items: Vec<CartLineItem> = serde_json::from_value(self.items)?;
        Ok(Cart::from_stored(self.id, self.user_id, items, self.total, self.updated_at))
    }
}

pub async fn find(ex: impl PgExecutor<'_>, user_id: Uuid) -> Result<Option<Cart>> {
    let row = sqlx::query_as::<_, CartRow>("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(ex)
        .await?;
    row.map(CartRow::into_cart).transpose()
}

/// Lock the user's cart row for the duration of the surrounding
/// transaction, serializing concurrent read-modify-write cycles on the
/// same cart.
pub async fn find_for_update(ex: impl PgExecutor<'_>, user_id: Uuid) -> Result<Option<Cart>> {
    let row = sqlx::query_as::<_, CartRow>("SELECT * FROM carts WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(ex)
        .await?;
    row.map(CartRow::into_cart).transpose()
}

/// Replace-or-create the user's cart in one statement.
pub async fn upsert(ex: impl PgExecutor<'_>, cart: &Cart) -> Result<()> {
    let items = serde_json::to_value(cart.items())?;
    sqlx::query(
        "INSERT INTO carts (user_id, id, items, total, updated_at) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id) DO UPDATE \
         SET items = EXCLUDED.items, total = EXCLUDED.total, updated_at = EXCLUDED.updated_at",
    )
    .bind(cart.user_id())
    .bind(cart.id())
    .bind(items)
    .bind(cart.total())
    .bind(cart.updated_at())
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn delete(ex: impl PgExecutor<'_>, user_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM carts WHERE user_id = $1")
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(())
}
