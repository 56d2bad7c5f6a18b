//! Main analytics engine: ledger queries, statistics and report composition

use crate::analytics::aggregation::MetricsAggregator;
use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::metrics::{
    AverageCheckStats, DailyOrders, MedianStats, PercentileStats, PeriodSummary,
};
use crate::analytics::range::{DateRange, Percentile};
use crate::analytics::reports::SalesReport;
use crate::analytics::statistics::{daily_entry, daily_series, Sample};
use crate::ledger::OrderLedger;
use crate::metrics::{measure_operation, record_orders_scanned};
use crate::models::Order;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// How the per-day series is fetched from the ledger
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DailyQueryStrategy {
    /// One `orders_on_date` query per day, run concurrently
    #[default]
    PerDay,

    /// One `orders_in_range` query partitioned by date in memory
    SingleRange,
}

/// Configuration for the analytics engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Deadline for a single ledger query (milliseconds)
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Deadline for a whole sales report (milliseconds)
    #[serde(default = "default_report_timeout_ms")]
    pub report_timeout_ms: u64,

    /// Maximum per-day queries in flight
    #[serde(default = "default_daily_query_concurrency")]
    pub daily_query_concurrency: usize,

    /// Daily series fetch strategy
    #[serde(default)]
    pub daily_strategy: DailyQueryStrategy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            report_timeout_ms: default_report_timeout_ms(),
            daily_query_concurrency: default_daily_query_concurrency(),
            daily_strategy: DailyQueryStrategy::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.query_timeout_ms == 0 || self.report_timeout_ms == 0 {
            return Err(AnalyticsError::InvalidConfiguration(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.daily_query_concurrency == 0 {
            return Err(AnalyticsError::InvalidConfiguration(
                "daily_query_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

fn default_report_timeout_ms() -> u64 {
    30_000
}

fn default_daily_query_concurrency() -> usize {
    8
}

/// Main analytics engine.
///
/// Holds no mutable state: every call re-reads the ledger, so one engine can be
/// shared freely between concurrent callers.
#[derive(Clone)]
pub struct AnalyticsEngine {
    ledger: Arc<dyn OrderLedger>,
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Create a new analytics engine over the given ledger
    pub fn new(ledger: Arc<dyn OrderLedger>, config: AnalyticsConfig) -> Self {
        Self { ledger, config }
    }

    /// Create with default configuration
    pub fn with_defaults(ledger: Arc<dyn OrderLedger>) -> Self {
        Self::new(ledger, AnalyticsConfig::default())
    }

    /// Run one ledger query under the per-query deadline
    async fn query<T, F>(&self, operation: &'static str, fut: F) -> AnalyticsResult<T>
    where
        F: Future<Output = crate::error::Result<T>>,
    {
        let timeout_ms = self.config.query_timeout_ms;
        match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "Ledger query failed");
                Err(e.into())
            }
            Err(_) => {
                tracing::warn!(operation, timeout_ms, "Ledger query deadline exceeded");
                Err(AnalyticsError::DeadlineExceeded {
                    operation,
                    timeout_ms,
                })
            }
        }
    }

    async fn orders_in(&self, operation: &'static str, range: &DateRange) -> AnalyticsResult<Vec<Order>> {
        let orders = self
            .query(operation, self.ledger.orders_in_range(range.start(), range.end()))
            .await?;
        tracing::debug!(operation, count = orders.len(), "Fetched orders");
        record_orders_scanned(operation, orders.len());
        Ok(orders)
    }

    /// Total revenue and order count; an empty period is `{0, 0}`
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
    pub async fn revenue_summary(&self, range: &DateRange) -> AnalyticsResult<PeriodSummary> {
        measure_operation("revenue_summary", async {
            let orders = self.orders_in("revenue_summary", range).await?;
            MetricsAggregator::summarize_revenue(range, &orders)
        })
        .await
    }

    /// One entry per day in `range`, ascending, no gaps
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
    pub async fn daily_order_counts(&self, range: &DateRange) -> AnalyticsResult<Vec<DailyOrders>> {
        measure_operation("daily_order_counts", async {
            match self.config.daily_strategy {
                DailyQueryStrategy::SingleRange => {
                    let orders = self.orders_in("daily_order_counts", range).await?;
                    daily_series(range, &orders)
                }
                DailyQueryStrategy::PerDay => {
                    // `buffered` yields in input order regardless of completion order
                    stream::iter(range.days())
                        .map(|day| async move {
                            let orders = self
                                .query("daily_order_counts", self.ledger.orders_on_date(day))
                                .await?;
                            record_orders_scanned("daily_order_counts", orders.len());
                            daily_entry(day, &orders)
                        })
                        .buffered(self.config.daily_query_concurrency.max(1))
                        .try_collect()
                        .await
                }
            }
        })
        .await
    }

    /// Mean, minimum and maximum check; all 0 for an empty period
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
    pub async fn average_check(&self, range: &DateRange) -> AnalyticsResult<AverageCheckStats> {
        measure_operation("average_check", async {
            let orders = self.orders_in("average_check", range).await?;
            MetricsAggregator::summarize_checks(range, &orders)
        })
        .await
    }

    async fn order_total_sample(&self, operation: &'static str, range: &DateRange) -> AnalyticsResult<Sample> {
        let orders = self.orders_in(operation, range).await?;
        Sample::from_order_totals(range, &orders)
    }

    async fn customer_spend_sample(&self, operation: &'static str, range: &DateRange) -> AnalyticsResult<Sample> {
        let spend = self
            .query(
                operation,
                self.ledger.customer_spend_in_range(range.start(), range.end()),
            )
            .await?;
        tracing::debug!(operation, customers = spend.len(), "Fetched customer spend");
        Sample::from_customer_spend(&spend)
    }

    /// Median order total
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
    pub async fn orders_median(&self, range: &DateRange) -> AnalyticsResult<MedianStats> {
        measure_operation("orders_median", async {
            Ok::<_, AnalyticsError>(self.order_total_sample("orders_median", range).await?.median())
        })
        .await
    }

    /// Median of per-customer summed spend
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
    pub async fn customer_spending_median(&self, range: &DateRange) -> AnalyticsResult<MedianStats> {
        measure_operation("customer_spending_median", async {
            Ok::<_, AnalyticsError>(self
                .customer_spend_sample("customer_spending_median", range)
                .await?
                .median())
        })
        .await
    }

    /// Percentile of order totals
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end(), percentile = p.value()))]
    pub async fn orders_percentile(
        &self,
        range: &DateRange,
        p: Percentile,
    ) -> AnalyticsResult<PercentileStats> {
        measure_operation("orders_percentile", async {
            Ok::<_, AnalyticsError>(self
                .order_total_sample("orders_percentile", range)
                .await?
                .percentile(p))
        })
        .await
    }

    /// Percentile of per-customer summed spend
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end(), percentile = p.value()))]
    pub async fn customer_spending_percentile(
        &self,
        range: &DateRange,
        p: Percentile,
    ) -> AnalyticsResult<PercentileStats> {
        measure_operation("customer_spending_percentile", async {
            Ok::<_, AnalyticsError>(self
                .customer_spend_sample("customer_spending_percentile", range)
                .await?
                .percentile(p))
        })
        .await
    }

    /// Compose the full sales report.
    ///
    /// Sections are computed concurrently. The first failing section aborts the
    /// report, dropping the queries still in flight, and its error is returned
    /// as is. No partial report is ever produced.
    #[tracing::instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
    pub async fn generate_report(&self, range: &DateRange) -> AnalyticsResult<SalesReport> {
        let timeout_ms = self.config.report_timeout_ms;

        let compose = measure_operation("generate_report", async {
            let (period, daily_stats, average_check, median, percentile_75, percentile_95) = tokio::try_join!(
                self.revenue_summary(range),
                self.daily_order_counts(range),
                self.average_check(range),
                self.orders_median(range),
                self.orders_percentile(range, Percentile::P75),
                self.orders_percentile(range, Percentile::P95),
            )?;

            Ok::<_, AnalyticsError>(SalesReport::new(
                period,
                daily_stats,
                average_check,
                median,
                percentile_75,
                percentile_95,
            ))
        });

        match tokio::time::timeout(Duration::from_millis(timeout_ms), compose).await {
            Ok(Ok(report)) => {
                tracing::info!(
                    orders = report.period.order_count,
                    days = report.daily_stats.len(),
                    "Sales report generated"
                );
                Ok(report)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Sales report aborted");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(timeout_ms, "Sales report deadline exceeded");
                Err(AnalyticsError::DeadlineExceeded {
                    operation: "generate_report",
                    timeout_ms,
                })
            }
        }
    }
}
