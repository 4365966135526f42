//! Order persistence. Line items are embedded as JSONB; rows are
//! insert-once, with status as the only mutable column.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::domain::{Order, OrderLineItem, OrderStatus};
use crate::error::{ApiError, Result};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    items: serde_json::Value,
    total: Decimal,
    status: String,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order> {
        let items: Vec<OrderLineItem> = serde_json::from_value(self.items)?;
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| ApiError::Internal(format!("unknown order status: {}", self.status)))?;
        Ok(Order::from_stored(
            self.id,
            self.user_id,
            items,
            self.total,
            status,
            self.shipping_address,
            self.created_at,
        ))
    }
}

pub async fn insert(ex: impl PgExecutor<'_>, order: &Order) -> Result<()> {
    let items = serde_json::to_value(order.items())?;
    sqlx::query(
        "INSERT INTO orders (id, user_id, items, total, status, shipping_address, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(order.id())
    .bind(order.user_id())
    .bind(items)
    .bind(order.total())
    .bind(order.status().as_str())
    .bind(order.shipping_address())
    .bind(order.created_at())
    .execute(ex)
    .await?;
    Ok(())
}

/// Scoped to the owning user: an order id belonging to someone else is
/// indistinguishable from a missing one.
pub async fn find_for_user(
    ex: impl PgExecutor<'_>,
    order_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(ex)
        .await?;
    row.map(OrderRow::into_order).transpose()
}

pub async fn list_for_user(ex: impl PgExecutor<'_>, user_id: Uuid) -> Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC LIMIT 100",
    )
    .bind(user_id)
    .fetch_all(ex)
    .await?;
    rows.into_iter().map(OrderRow::into_order).collect()
}

pub async fn set_status(ex: impl PgExecutor<'_>, order_id: Uuid, status: OrderStatus) -> Result<()> {
    sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
        .bind(order_id)
        .bind(status.as_str())
        .execute(ex)
        .await?;
    Ok(())
}
