//! Payment record.
//!
//! Models an always-succeeds gateway: processing a payment inserts a
//! completed record for the order's current total. No authorization,
//! retry, or failure path.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    id: Uuid,
    order_id: Uuid,
    amount: Decimal,
    status: PaymentStatus,
    method: String,
    created_at: DateTime<Utc>,
}

impl Payment {
    pub fn completed(order_id: Uuid, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            amount,
            status: PaymentStatus::Completed,
            method: "mock".to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_completed_payment() {
        let order_id = Uuid::new_v4();
        let payment = Payment::completed(order_id, dec!(25.00));
        assert_eq!(payment.order_id(), order_id);
        assert_eq!(payment.amount(), dec!(25.00));
        assert_eq!(payment.status(), PaymentStatus::Completed);
        assert_eq!(payment.method(), "mock");
    }
}
