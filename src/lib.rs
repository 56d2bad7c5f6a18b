//! Sales analytics engine: revenue, daily order series, average check,
//! medians and percentiles over an order ledger.

pub mod analytics;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod models;

pub use error::{AppError, Result};
