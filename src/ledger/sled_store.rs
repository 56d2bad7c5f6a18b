use crate::error::{AppError, Result};
use crate::ledger::{read_seed_file, OrderLedger};
use crate::models::Order;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

const DAY_KEY_LEN: usize = 4;

/// Persistent order ledger using the Sled embedded database.
///
/// Keys are `day || order id` so that a date range maps onto one contiguous
/// key range and day filtering happens inside the tree scan.
#[derive(Clone)]
pub struct SledLedger {
    db: Arc<Db>,
    orders_tree: sled::Tree,
}

impl SledLedger {
    /// Open (or create) a ledger at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            AppError::Database(format!("Failed to open Sled database: {}", e))
        })?;

        let orders_tree = db.open_tree("orders").map_err(|e| {
            AppError::Database(format!("Failed to open orders tree: {}", e))
        })?;

        tracing::info!("Initialized Sled ledger at {:?}", path.as_ref());

        Ok(Self {
            db: Arc::new(db),
            orders_tree,
        })
    }

    /// Order-preserving big-endian encoding of a calendar day.
    ///
    /// Flipping the sign bit keeps dates before the common era sorted ahead of
    /// later ones.
    fn day_prefix(date: NaiveDate) -> [u8; DAY_KEY_LEN] {
        ((date.num_days_from_ce() as u32) ^ 0x8000_0000).to_be_bytes()
    }

    fn order_key(order: &Order) -> Vec<u8> {
        let mut key = Vec::with_capacity(DAY_KEY_LEN + 16);
        key.extend_from_slice(&Self::day_prefix(order.order_date));
        key.extend_from_slice(order.id.as_bytes());
        key
    }

    fn serialize_order(order: &Order) -> Result<Vec<u8>> {
        bincode::serialize(order)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize order: {}", e)))
    }

    fn deserialize_order(bytes: &[u8]) -> Result<Order> {
        bincode::deserialize(bytes)
            .map_err(|e| AppError::Serialization(format!("Failed to deserialize order: {}", e)))
    }

    /// Seed an order into the ledger
    pub fn insert(&self, order: &Order) -> Result<()> {
        order.validate()?;
        let key = Self::order_key(order);
        let value = Self::serialize_order(order)?;

        self.orders_tree.insert(key, value).map_err(|e| {
            AppError::Database(format!("Failed to save order: {}", e))
        })?;

        tracing::debug!(order_id = %order.id, "Order saved to Sled");
        Ok(())
    }

    /// Load orders from a JSON array file and flush them to disk
    pub async fn load_json_file<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let orders = read_seed_file(path.as_ref()).await?;
        for order in &orders {
            self.insert(order)?;
        }
        self.flush().await?;

        tracing::info!(path = ?path.as_ref(), orders = orders.len(), "Loaded orders into Sled ledger");
        Ok(orders.len())
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders_tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders_tree.is_empty()
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(|e| {
            AppError::Database(format!("Failed to flush database: {}", e))
        })?;
        Ok(())
    }

    fn collect_orders<I>(iter: I) -> Result<Vec<Order>>
    where
        I: Iterator<Item = sled::Result<(sled::IVec, sled::IVec)>>,
    {
        iter.map(|entry| {
            let (_, value) = entry.map_err(|e| {
                AppError::Database(format!("Failed to iterate orders: {}", e))
            })?;
            Self::deserialize_order(&value)
        })
        .collect()
    }
}

#[async_trait]
impl OrderLedger for SledLedger {
    async fn orders_in_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Order>> {
        if start > end {
            return Ok(Vec::new());
        }

        let lower = Self::day_prefix(start).to_vec();
        let mut upper = Self::day_prefix(end).to_vec();
        upper.extend_from_slice(&[0xFF; 16]);

        let orders = Self::collect_orders(self.orders_tree.range(lower..=upper))?;
        tracing::debug!(%start, %end, count = orders.len(), "Sled range scan");
        Ok(orders)
    }

    async fn orders_on_date(&self, date: NaiveDate) -> Result<Vec<Order>> {
        Self::collect_orders(self.orders_tree.scan_prefix(Self::day_prefix(date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_prefix_preserves_order() {
        let days = [
            date(-44, 3, 15),
            date(1, 1, 1),
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 1, 2),
        ];
        for pair in days.windows(2) {
            assert!(SledLedger::day_prefix(pair[0]) < SledLedger::day_prefix(pair[1]));
        }
    }

    #[tokio::test]
    async fn test_range_scan_across_month_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = SledLedger::new(temp_dir.path()).unwrap();

        for order in [
            Order::new(1, date(2024, 1, 30), 10.0),
            Order::new(2, date(2024, 1, 31), 20.0),
            Order::new(3, date(2024, 2, 1), 30.0),
            Order::new(4, date(2024, 2, 2), 40.0),
        ] {
            ledger.insert(&order).unwrap();
        }

        let orders = ledger
            .orders_in_range(date(2024, 1, 31), date(2024, 2, 1))
            .await
            .unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_date, date(2024, 1, 31));
        assert_eq!(orders[1].order_date, date(2024, 2, 1));
    }

    #[tokio::test]
    async fn test_orders_on_date_prefix_scan() {
        let temp_dir = TempDir::new().unwrap();
        let ledger = SledLedger::new(temp_dir.path()).unwrap();

        let a = Order::new(1, date(2024, 5, 5), 10.0);
        let b = Order::new(2, date(2024, 5, 5), 15.0);
        let c = Order::new(3, date(2024, 5, 6), 20.0);
        for order in [&a, &b, &c] {
            ledger.insert(order).unwrap();
        }

        let orders = ledger.orders_on_date(date(2024, 5, 5)).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders.contains(&a));
        assert!(orders.contains(&b));
    }

    #[tokio::test]
    async fn test_reopen_persists_orders() {
        let temp_dir = TempDir::new().unwrap();
        {
            let ledger = SledLedger::new(temp_dir.path()).unwrap();
            ledger.insert(&Order::new(1, date(2024, 1, 1), 99.0)).unwrap();
            ledger.flush().await.unwrap();
        }

        let ledger = SledLedger::new(temp_dir.path()).unwrap();
        assert_eq!(ledger.len(), 1);
        let orders = ledger
            .orders_in_range(date(2024, 1, 1), date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(orders[0].total_amount, 99.0);
    }
}
