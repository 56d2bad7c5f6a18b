use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Identifier of the customer that placed an order
pub type CustomerId = i64;

/// A persisted order as seen by the analytics core.
///
/// Orders are owned by the ledger; the analytics engine only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,

    /// Customer who placed the order
    pub customer_id: CustomerId,

    /// Calendar date the order belongs to
    pub order_date: NaiveDate,

    /// Fulfilment status
    #[serde(default)]
    pub status: OrderStatus,

    /// How the order was paid
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Order total in the store currency
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
}

impl Order {
    /// Create a new completed order
    pub fn new(customer_id: CustomerId, order_date: NaiveDate, total_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            order_date,
            status: OrderStatus::Completed,
            payment_method: PaymentMethod::Card,
            total_amount,
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Total is a finite, non-negative amount
    pub fn has_valid_total(&self) -> bool {
        self.total_amount.is_finite() && self.total_amount >= 0.0
    }

    /// Order date lies in `[start, end]`
    pub fn falls_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.order_date >= start && self.order_date <= end
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    #[default]
    Completed,
    Cancelled,
    Refunded,
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    BankTransfer,
    Online,
}
