//! Prometheus instrumentation for analytics operations.
//!
//! Collectors are created lazily and recorded into unconditionally; they only
//! become visible in [`gather_metrics`] once [`init_metrics`] registered them.
//!
//! # Example
//! ```no_run
//! use sales_analytics::metrics::{init_metrics, gather_metrics};
//!
//! init_metrics().expect("metrics registered once");
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::future::Future;
use std::time::Instant;

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Analytics operations by outcome
    ///
    /// Labels: operation, status (success | error)
    pub static ref ANALYTICS_OPERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("operations_total", "Total number of analytics operations")
            .namespace("sales_analytics"),
        &["operation", "status"]
    ).expect("Failed to create ANALYTICS_OPERATIONS_TOTAL metric");

    /// Analytics operation duration in seconds
    ///
    /// Labels: operation
    pub static ref ANALYTICS_OPERATION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "operation_duration_seconds",
            "Analytics operation duration in seconds"
        )
        .namespace("sales_analytics")
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["operation"]
    ).expect("Failed to create ANALYTICS_OPERATION_DURATION_SECONDS metric");

    /// Orders read from the ledger
    ///
    /// Labels: operation
    pub static ref ORDERS_SCANNED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("orders_scanned_total", "Total number of orders read from the ledger")
            .namespace("sales_analytics"),
        &["operation"]
    ).expect("Failed to create ORDERS_SCANNED_TOTAL metric");
}

/// Register all collectors with the global registry
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(ANALYTICS_OPERATIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ANALYTICS_OPERATION_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ORDERS_SCANNED_TOTAL.clone()))?;
    Ok(())
}

/// Render the registry in the Prometheus text exposition format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

/// Record how many orders an operation pulled from the ledger
pub fn record_orders_scanned(operation: &str, count: usize) {
    ORDERS_SCANNED_TOTAL
        .with_label_values(&[operation])
        .inc_by(count as f64);
}

/// Time a fallible async operation and count its outcome
pub async fn measure_operation<F, T, E>(operation: &str, f: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = f.await;
    let duration = start.elapsed().as_secs_f64();

    ANALYTICS_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    let status = if result.is_ok() { "success" } else { "error" };
    ANALYTICS_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_operation_counts_outcomes() {
        let before_ok = ANALYTICS_OPERATIONS_TOTAL
            .with_label_values(&["unit_test_op", "success"])
            .get();
        let before_err = ANALYTICS_OPERATIONS_TOTAL
            .with_label_values(&["unit_test_op", "error"])
            .get();

        let ok: Result<u32, &str> = measure_operation("unit_test_op", async { Ok(1) }).await;
        let err: Result<u32, &str> = measure_operation("unit_test_op", async { Err("boom") }).await;

        assert_eq!(ok, Ok(1));
        assert_eq!(err, Err("boom"));
        assert_eq!(
            ANALYTICS_OPERATIONS_TOTAL
                .with_label_values(&["unit_test_op", "success"])
                .get(),
            before_ok + 1.0
        );
        assert_eq!(
            ANALYTICS_OPERATIONS_TOTAL
                .with_label_values(&["unit_test_op", "error"])
                .get(),
            before_err + 1.0
        );
    }

    #[test]
    fn test_gather_after_init() {
        // The registry is global; a second registration in the same process is rejected
        let _ = init_metrics();
        record_orders_scanned("unit_test_scan", 3);
        let text = gather_metrics();
        assert!(text.contains("sales_analytics_orders_scanned_total"));
    }
}
