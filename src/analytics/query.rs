//! Parsing of raw caller input into validated analytics parameters

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::range::{DateRange, Percentile};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

/// Date format accepted from callers
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw analytics query as it arrives from a caller (query string, CLI flags)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyticsQuery {
    #[validate(length(equal = 10))]
    pub start: String,

    #[validate(length(equal = 10))]
    pub end: String,

    #[validate(range(min = 0, max = 100))]
    pub percentile: Option<i64>,
}

impl AnalyticsQuery {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            percentile: None,
        }
    }

    pub fn with_percentile(mut self, percentile: i64) -> Self {
        self.percentile = Some(percentile);
        self
    }

    /// Parse and validate the date range
    pub fn range(&self) -> AnalyticsResult<DateRange> {
        let start = parse_date(&self.start)
            .ok_or_else(|| AnalyticsError::InvalidDate("invalid start date format, use YYYY-MM-DD".to_string()))?;
        let end = parse_date(&self.end)
            .ok_or_else(|| AnalyticsError::InvalidDate("invalid end date format, use YYYY-MM-DD".to_string()))?;
        DateRange::new(start, end)
    }

    /// Parse and validate the requested percentile
    pub fn percentile(&self) -> AnalyticsResult<Percentile> {
        let raw = self.percentile.ok_or(AnalyticsError::MissingPercentile)?;
        Percentile::new(raw)
    }
}

/// Parse a zero-padded `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    // chrono accepts unpadded fields such as `2024-1-1`
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
