//! Sales analytics over an order ledger
//!
//! This module turns raw orders into the figures a sales dashboard needs.
//!
//! # Features
//!
//! - **Revenue Summary**: total revenue and order count for a period
//! - **Daily Series**: per-day order counts and amounts without gaps
//! - **Average Check**: mean, minimum and maximum order total
//! - **Medians and Percentiles**: over order totals or per-customer spend,
//!   linear interpolation between closest ranks
//! - **Sales Report**: all of the above composed concurrently, fail-fast
//! - **Export Formats**: JSON and CSV
//!
//! # Example
//!
//! ```no_run
//! use sales_analytics::analytics::{AnalyticsEngine, AnalyticsQuery};
//! use sales_analytics::ledger::create_in_memory_ledger;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = AnalyticsEngine::with_defaults(create_in_memory_ledger());
//!
//!     let range = AnalyticsQuery::new("2024-01-01", "2024-01-31").range()?;
//!     let report = engine.generate_report(&range).await?;
//!     println!("{}", report.headline());
//!
//!     Ok(())
//! }
//! ```

mod aggregation;
mod engine;
mod error;
mod export;
mod metrics;
mod query;
mod range;
mod reports;
mod statistics;

pub use aggregation::MetricsAggregator;
pub use engine::{AnalyticsConfig, AnalyticsEngine, DailyQueryStrategy};
pub use error::{AnalyticsError, AnalyticsResult};
pub use export::{ExportFormat, ReportExporter};
pub use metrics::{
    AverageCheckStats, DailyOrders, MedianStats, PercentileStats, PeriodSummary, SampleMetric,
};
pub use query::{parse_date, AnalyticsQuery, DATE_FORMAT};
pub use range::{DateRange, Percentile};
pub use reports::SalesReport;
pub use statistics::{daily_entry, daily_series, median, percentile, Sample};
