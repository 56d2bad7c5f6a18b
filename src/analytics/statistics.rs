//! Order-set statistics: daily series, samples, medians and percentiles

use crate::analytics::aggregation::MetricsAggregator;
use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::metrics::{DailyOrders, MedianStats, PercentileStats, SampleMetric};
use crate::analytics::range::{DateRange, Percentile};
use crate::models::{CustomerId, Order};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// A numeric sample sorted ascending
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    metric: SampleMetric,
    sorted: Vec<f64>,
}

impl Sample {
    /// Build a sample from unordered observations
    pub fn new(metric: SampleMetric, mut values: Vec<f64>) -> AnalyticsResult<Self> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(AnalyticsError::InvalidRecord(format!(
                "non-finite observation {} in {} sample",
                bad, metric
            )));
        }

        values.sort_by(|a, b| a.total_cmp(b));

        Ok(Self {
            metric,
            sorted: values,
        })
    }

    /// Individual order totals inside the range
    pub fn from_order_totals(range: &DateRange, orders: &[Order]) -> AnalyticsResult<Self> {
        let totals = MetricsAggregator::orders_in(range, orders)?
            .into_iter()
            .map(|o| o.total_amount)
            .collect();
        Self::new(SampleMetric::OrderTotal, totals)
    }

    /// One observation per customer: that customer's summed spend
    pub fn from_customer_spend(spend: &HashMap<CustomerId, f64>) -> AnalyticsResult<Self> {
        if let Some((customer, total)) = spend.iter().find(|(_, total)| **total < 0.0) {
            return Err(AnalyticsError::InvalidRecord(format!(
                "customer {} has negative spend {}",
                customer, total
            )));
        }
        Self::new(SampleMetric::CustomerSpending, spend.values().copied().collect())
    }

    pub fn metric(&self) -> SampleMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Observations in ascending order
    pub fn values(&self) -> &[f64] {
        &self.sorted
    }

    /// Percentile of the sample; an empty sample reports value 0
    pub fn percentile(&self, p: Percentile) -> PercentileStats {
        PercentileStats {
            metric: self.metric,
            percentile: p.value(),
            value: percentile(&self.sorted, f64::from(p.value())),
            sample_size: self.sorted.len(),
        }
    }

    /// Median of the sample, computed as the 50th percentile
    pub fn median(&self) -> MedianStats {
        let p50 = self.percentile(Percentile::MEDIAN);
        MedianStats {
            metric: self.metric,
            median: p50.value,
            sample_size: p50.sample_size,
        }
    }
}

/// Linear-interpolated percentile of ascending data.
///
/// Rank `R = p/100 * (n - 1)`; the result interpolates between the values at
/// `floor(R)` and `ceil(R)` by the fractional part of `R`. Returns 0 for empty
/// data.
pub fn percentile(sorted_data: &[f64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f64;
        sorted_data[lower] + (sorted_data[upper] - sorted_data[lower]) * weight
    }
}

/// Median of ascending data
pub fn median(sorted_data: &[f64]) -> f64 {
    percentile(sorted_data, 50.0)
}

/// Count and total of the orders placed exactly on `date`
pub fn daily_entry(date: NaiveDate, orders: &[Order]) -> AnalyticsResult<DailyOrders> {
    let day = MetricsAggregator::orders_in(&DateRange::single_day(date), orders)?;

    Ok(DailyOrders {
        date,
        order_count: day.len() as u64,
        total_amount: day.iter().map(|o| o.total_amount).sum(),
    })
}

/// One entry per day of the range, ascending, with zero entries for quiet days.
///
/// Partitions a single range result client-side.
pub fn daily_series(range: &DateRange, orders: &[Order]) -> AnalyticsResult<Vec<DailyOrders>> {
    let mut by_day: BTreeMap<NaiveDate, DailyOrders> =
        range.days().map(|d| (d, DailyOrders::empty(d))).collect();

    for order in MetricsAggregator::orders_in(range, orders)? {
        if let Some(entry) = by_day.get_mut(&order.order_date) {
            entry.order_count += 1;
            entry.total_amount += order.total_amount;
        }
    }

    Ok(by_day.into_values().collect())
}
