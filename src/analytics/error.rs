//! Error types for analytics operations

use crate::error::AppError;
use chrono::NaiveDate;

/// Result type for analytics operations
pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur in analytics operations.
///
/// An empty period is never an error: zero matching orders always yields a
/// zero-valued result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    /// Start date after end date
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Percentile outside [0, 100]
    #[error("invalid percentile, must be between 0 and 100 (got {0})")]
    InvalidPercentile(i64),

    /// No percentile supplied where one is required
    #[error("percentile is required")]
    MissingPercentile,

    /// Unparseable date supplied at the boundary
    #[error("{0}")]
    InvalidDate(String),

    /// The ledger returned an order that breaks the order invariants
    #[error("Invalid order record: {0}")]
    InvalidRecord(String),

    /// The ledger could not be read
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A ledger query or the whole report ran past its deadline
    #[error("Deadline exceeded: {operation} did not finish within {timeout_ms}ms")]
    DeadlineExceeded {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// Export failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl AnalyticsError {
    /// Whether the caller supplied bad input (as opposed to a server-side fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InvalidRange { .. }
                | AnalyticsError::InvalidPercentile(_)
                | AnalyticsError::MissingPercentile
                | AnalyticsError::InvalidDate(_)
        )
    }
}

impl From<AppError> for AnalyticsError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Timeout(msg) => AnalyticsError::StorageUnavailable(format!("timeout: {}", msg)),
            AppError::Validation(msg) => AnalyticsError::InvalidRecord(msg),
            other => AnalyticsError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidRange { .. }
            | AnalyticsError::InvalidPercentile(_)
            | AnalyticsError::MissingPercentile
            | AnalyticsError::InvalidDate(_) => AppError::Validation(err.to_string()),
            AnalyticsError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            AnalyticsError::StorageUnavailable(msg) => AppError::Database(msg),
            AnalyticsError::DeadlineExceeded { .. } => AppError::Timeout(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}
