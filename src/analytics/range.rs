//! Validated query parameters

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar-date range with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AnalyticsResult<Self> {
        if start > end {
            return Err(AnalyticsError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends
    pub fn num_days(&self) -> usize {
        self.end.signed_duration_since(self.start).num_days() as usize + 1
    }

    /// Every day in the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        // Every offset stays within `end`, so the addition cannot overflow
        (0..self.num_days() as u64)
            .filter_map(move |offset| start.checked_add_days(Days::new(offset)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: NaiveDate,
            end: NaiveDate,
        }

        let raw = Raw::deserialize(deserializer)?;
        DateRange::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Percentile rank in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percentile(u8);

impl Percentile {
    pub const MEDIAN: Percentile = Percentile(50);
    pub const P75: Percentile = Percentile(75);
    pub const P95: Percentile = Percentile(95);

    pub fn new(value: i64) -> AnalyticsResult<Self> {
        if !(0..=100).contains(&value) {
            return Err(AnalyticsError::InvalidPercentile(value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Percentile {
    type Error = AnalyticsError;

    fn try_from(value: i64) -> AnalyticsResult<Self> {
        Percentile::new(value)
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = DateRange::new(date(2024, 1, 3), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidRange { .. }));
    }

    #[test]
    fn test_days_are_inclusive_and_ascending() {
        let range = DateRange::new(date(2024, 2, 27), date(2024, 3, 1)).unwrap();
        let days: Vec<_> = range.days().collect();

        assert_eq!(range.num_days(), 4);
        assert_eq!(
            days,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
    }

    #[test]
    fn test_days_reach_the_last_representable_date() {
        let last = NaiveDate::MAX;
        let range = DateRange::new(last.pred_opt().unwrap(), last).unwrap();

        assert_eq!(range.num_days(), 2);
        assert_eq!(range.days().collect::<Vec<_>>(), vec![last.pred_opt().unwrap(), last]);
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::single_day(date(2024, 1, 1));
        assert_eq!(range.num_days(), 1);
        assert!(range.contains(date(2024, 1, 1)));
        assert!(!range.contains(date(2024, 1, 2)));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DateRange = serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
        assert_eq!(ok.num_days(), 31);

        let bad = serde_json::from_str::<DateRange>(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_percentile_bounds() {
        assert_eq!(Percentile::new(0).unwrap().value(), 0);
        assert_eq!(Percentile::new(100).unwrap().value(), 100);
        assert_eq!(Percentile::new(-1), Err(AnalyticsError::InvalidPercentile(-1)));
        assert_eq!(Percentile::try_from(101), Err(AnalyticsError::InvalidPercentile(101)));
        assert_eq!(Percentile::MEDIAN.to_string(), "p50");
    }
}
