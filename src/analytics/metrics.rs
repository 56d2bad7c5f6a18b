//! Derived value objects returned by the analytics engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Revenue totals for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Sum of order totals; 0 when the period has no orders
    pub total_revenue: f64,

    /// Number of orders in the period
    pub order_count: u64,
}

/// Orders placed on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub order_count: u64,
    pub total_amount: f64,
}

impl DailyOrders {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            order_count: 0,
            total_amount: 0.0,
        }
    }
}

/// Average, smallest and largest check for a period.
///
/// All three are 0 for a period without orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageCheckStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub average_check: f64,
    pub min_check: f64,
    pub max_check: f64,
}

/// Which numeric sample a statistic summarizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SampleMetric {
    /// Individual order totals
    OrderTotal,

    /// Summed spend per customer
    CustomerSpending,
}

/// Median of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianStats {
    pub metric: SampleMetric,
    pub median: f64,
    pub sample_size: usize,
}

/// A single percentile of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileStats {
    pub metric: SampleMetric,
    pub percentile: u8,
    pub value: f64,
    pub sample_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert_eq!(SampleMetric::OrderTotal.to_string(), "order_total");
        assert_eq!(
            serde_json::to_value(SampleMetric::CustomerSpending).unwrap(),
            serde_json::json!("customer_spending")
        );
    }

    #[test]
    fn test_daily_orders_json_shape() {
        let day = DailyOrders::empty(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(
            serde_json::to_value(&day).unwrap(),
            serde_json::json!({"date": "2024-01-02", "order_count": 0, "total_amount": 0.0})
        );
    }
}
