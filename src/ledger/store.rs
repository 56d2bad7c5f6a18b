use crate::error::Result;
use crate::ledger::{read_seed_file, OrderLedger};
use crate::models::Order;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// In-memory order ledger (for development and testing)
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    orders: Arc<DashMap<Uuid, Order>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger holding the given orders
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Result<Self> {
        let ledger = Self::new();
        ledger.extend(orders)?;
        Ok(ledger)
    }

    /// Seed a single order
    pub fn insert(&self, order: Order) -> Result<()> {
        order.validate()?;
        tracing::debug!(order_id = %order.id, date = %order.order_date, "Order seeded");
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Seed many orders
    pub fn extend(&self, orders: impl IntoIterator<Item = Order>) -> Result<()> {
        for order in orders {
            self.insert(order)?;
        }
        Ok(())
    }

    /// Load orders from a JSON array file
    pub async fn load_json_file<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let orders = read_seed_file(path.as_ref()).await?;
        let count = orders.len();
        self.extend(orders)?;

        tracing::info!(path = ?path.as_ref(), orders = count, "Loaded orders into in-memory ledger");
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl OrderLedger for InMemoryLedger {
    async fn orders_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.value().falls_within(start, end))
            .map(|entry| entry.value().clone())
            .collect();

        // DashMap iteration order is arbitrary
        orders.sort_by(|a, b| a.order_date.cmp(&b.order_date).then(a.id.cmp(&b.id)));
        Ok(orders)
    }
}
