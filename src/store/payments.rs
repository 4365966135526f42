//! Payment persistence.

use sqlx::PgExecutor;

use crate::domain::Payment;
use crate::error::Result;

pub async fn insert(ex: impl PgExecutor<'_>, payment: &Payment) -> Result<()> {
    sqlx::query(
        "INSERT INTO payments (id, order_id, amount, status, method, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(payment.id())
    .bind(payment.order_id())
    .bind(payment.amount())
    .bind(payment.status().as_str())
    .bind(payment.method())
    .bind(payment.created_at())
    .execute(ex)
    .await?;
    Ok(())
}
