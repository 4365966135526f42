//! Mock payment endpoint: records a completed payment for the order's
//! current total and flips the order to paid.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::domain::{OrderStatus, Payment};
use crate::error::{ApiError, Result};
use crate::store::{orders, payments};
use crate::AppState;

pub async fn process_payment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Payment>> {
    let mut tx = state.db.begin().await?;
    let order = orders::find_for_user(&mut *tx, order_id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    let payment = Payment::completed(order.id(), order.total());
    payments::insert(&mut *tx, &payment).await?;
    orders::set_status(&mut *tx, order.id(), OrderStatus::Paid).await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id(), amount = %payment.amount(), "payment processed");
    Ok(Json(payment))
}
