//! Composite sales report

use crate::analytics::metrics::{
    AverageCheckStats, DailyOrders, MedianStats, PercentileStats, PeriodSummary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full sales report for one date range.
///
/// Every section is computed from the same requested range, but by separate
/// ledger queries: writes landing between those queries can make sections
/// disagree slightly. The report is not a point-in-time snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub period: PeriodSummary,

    pub daily_stats: Vec<DailyOrders>,

    pub average_check: AverageCheckStats,

    /// Median order total
    pub median: MedianStats,

    pub percentile_75: PercentileStats,

    pub percentile_95: PercentileStats,

    pub generated_at: DateTime<Utc>,
}

impl SalesReport {
    pub fn new(
        period: PeriodSummary,
        daily_stats: Vec<DailyOrders>,
        average_check: AverageCheckStats,
        median: MedianStats,
        percentile_75: PercentileStats,
        percentile_95: PercentileStats,
    ) -> Self {
        Self {
            period,
            daily_stats,
            average_check,
            median,
            percentile_75,
            percentile_95,
            generated_at: Utc::now(),
        }
    }

    /// One-line human readable digest
    pub fn headline(&self) -> String {
        format!(
            "{} orders, revenue {:.2}, average check {:.2}, median {:.2} ({} to {})",
            self.period.order_count,
            self.period.total_revenue,
            self.average_check.average_check,
            self.median.median,
            self.period.start_date,
            self.period.end_date
        )
    }

    /// Busiest day by order count, earliest first on ties
    pub fn peak_day(&self) -> Option<&DailyOrders> {
        self.daily_stats
            .iter()
            .filter(|d| d.order_count > 0)
            .fold(None, |best: Option<&DailyOrders>, d| match best {
                Some(b) if b.order_count >= d.order_count => Some(b),
                _ => Some(d),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::SampleMetric;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn report() -> SalesReport {
        SalesReport::new(
            PeriodSummary {
                start_date: date(1),
                end_date: date(3),
                total_revenue: 600.0,
                order_count: 3,
            },
            vec![
                DailyOrders { date: date(1), order_count: 2, total_amount: 400.0 },
                DailyOrders::empty(date(2)),
                DailyOrders { date: date(3), order_count: 1, total_amount: 200.0 },
            ],
            AverageCheckStats {
                start_date: date(1),
                end_date: date(3),
                average_check: 200.0,
                min_check: 100.0,
                max_check: 300.0,
            },
            MedianStats {
                metric: SampleMetric::OrderTotal,
                median: 200.0,
                sample_size: 3,
            },
            PercentileStats {
                metric: SampleMetric::OrderTotal,
                percentile: 75,
                value: 250.0,
                sample_size: 3,
            },
            PercentileStats {
                metric: SampleMetric::OrderTotal,
                percentile: 95,
                value: 290.0,
                sample_size: 3,
            },
        )
    }

    #[test]
    fn test_json_keys() {
        let value = serde_json::to_value(report()).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "period",
            "daily_stats",
            "average_check",
            "median",
            "percentile_75",
            "percentile_95",
            "generated_at",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(value["median"]["metric"], "order_total");
        assert_eq!(value["period"]["start_date"], "2024-01-01");
    }

    #[test]
    fn test_headline_and_peak_day() {
        let report = report();
        assert!(report.headline().starts_with("3 orders, revenue 600.00"));
        assert_eq!(report.peak_day().unwrap().date, date(1));
    }
}
