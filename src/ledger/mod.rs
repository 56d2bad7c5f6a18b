//! Read access to the order ledger.
//!
//! The analytics engine never writes orders. It consumes this trait and nothing
//! else, so any store that can answer the three range queries below can back it.

pub mod factory;
pub mod sled_store;
pub mod store;

pub use factory::{create_in_memory_ledger, create_ledger};
pub use sled_store::SledLedger;
pub use store::InMemoryLedger;

use crate::error::{AppError, Result};
use crate::models::{CustomerId, Order};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

/// Trait for read-only order ledger access
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// All orders whose date lies in `[start, end]`, both ends inclusive
    async fn orders_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Order>>;

    /// All orders placed on a single day
    async fn orders_on_date(&self, date: NaiveDate) -> Result<Vec<Order>> {
        self.orders_in_range(date, date).await
    }

    /// Summed order totals per customer over `[start, end]`
    async fn customer_spend_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<CustomerId, f64>> {
        let orders = self.orders_in_range(start, end).await?;
        sum_by_customer(&orders)
    }
}

/// Group orders by customer and sum their totals.
///
/// Fails on the first order with a negative or non-finite total.
pub fn sum_by_customer(orders: &[Order]) -> Result<HashMap<CustomerId, f64>> {
    let mut spend: HashMap<CustomerId, f64> = HashMap::new();
    for order in orders {
        if !order.has_valid_total() {
            return Err(AppError::Validation(format!(
                "order {} has total_amount {}",
                order.id, order.total_amount
            )));
        }
        *spend.entry(order.customer_id).or_insert(0.0) += order.total_amount;
    }
    Ok(spend)
}

/// Read a JSON array of orders used to seed a ledger
pub async fn read_seed_file(path: &Path) -> Result<Vec<Order>> {
    let raw = tokio::fs::read(path).await.map_err(|e| {
        AppError::Configuration(format!("Failed to read seed file {:?}: {}", path, e))
    })?;
    Ok(serde_json::from_slice(&raw)?)
}
