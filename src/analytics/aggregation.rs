//! Scalar aggregates over a filtered order set

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::metrics::{AverageCheckStats, PeriodSummary};
use crate::analytics::range::DateRange;
use crate::models::Order;

/// Aggregator for order totals
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Orders inside the range, rejecting any record with an invalid total
    pub fn orders_in<'a>(range: &DateRange, orders: &'a [Order]) -> AnalyticsResult<Vec<&'a Order>> {
        let mut filtered = Vec::with_capacity(orders.len());
        for order in orders {
            if !order.has_valid_total() {
                return Err(AnalyticsError::InvalidRecord(format!(
                    "order {} has total_amount {}",
                    order.id, order.total_amount
                )));
            }
            if range.contains(order.order_date) {
                filtered.push(order);
            }
        }
        Ok(filtered)
    }

    /// Total revenue and order count for the range.
    ///
    /// A range without orders yields `{total_revenue: 0, order_count: 0}`.
    pub fn summarize_revenue(range: &DateRange, orders: &[Order]) -> AnalyticsResult<PeriodSummary> {
        let filtered = Self::orders_in(range, orders)?;

        Ok(PeriodSummary {
            start_date: range.start(),
            end_date: range.end(),
            total_revenue: filtered.iter().map(|o| o.total_amount).sum(),
            order_count: filtered.len() as u64,
        })
    }

    /// Mean, minimum and maximum order total for the range
    pub fn summarize_checks(range: &DateRange, orders: &[Order]) -> AnalyticsResult<AverageCheckStats> {
        let filtered = Self::orders_in(range, orders)?;

        if filtered.is_empty() {
            return Ok(AverageCheckStats {
                start_date: range.start(),
                end_date: range.end(),
                average_check: 0.0,
                min_check: 0.0,
                max_check: 0.0,
            });
        }

        let total: f64 = filtered.iter().map(|o| o.total_amount).sum();
        let (min_check, max_check) = filtered.iter().fold((f64::MAX, f64::MIN), |(lo, hi), o| {
            (lo.min(o.total_amount), hi.max(o.total_amount))
        });

        Ok(AverageCheckStats {
            start_date: range.start(),
            end_date: range.end(),
            average_check: total / filtered.len() as f64,
            min_check,
            max_check,
        })
    }
}
