//! Report export formats and utilities

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::reports::SalesReport;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;

/// Export format for reports
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// Report exporter
pub struct ReportExporter;

impl ReportExporter {
    /// Render a report into bytes of the requested format
    pub fn render(report: &SalesReport, format: ExportFormat) -> AnalyticsResult<Vec<u8>> {
        match format {
            ExportFormat::Json => serde_json::to_vec_pretty(report).map_err(|e| {
                AnalyticsError::ExportFailed(format!("JSON serialization failed: {}", e))
            }),
            ExportFormat::Csv => Self::render_csv(report)
                .map(String::into_bytes)
                .map_err(|e| AnalyticsError::ExportFailed(format!("CSV rendering failed: {}", e))),
        }
    }

    /// Render and write a report to `output_path`
    pub async fn export(
        report: &SalesReport,
        format: ExportFormat,
        output_path: &Path,
    ) -> AnalyticsResult<Vec<u8>> {
        let bytes = Self::render(report, format)?;

        fs::write(output_path, &bytes)
            .await
            .map_err(|e| AnalyticsError::ExportFailed(format!("Failed to write file: {}", e)))?;

        tracing::info!(path = ?output_path, format = format.extension(), "Report exported");
        Ok(bytes)
    }

    fn render_csv(report: &SalesReport) -> Result<String, std::fmt::Error> {
        let mut csv = String::new();

        writeln!(csv, "Field,Value")?;
        writeln!(csv, "start_date,{}", report.period.start_date)?;
        writeln!(csv, "end_date,{}", report.period.end_date)?;
        writeln!(csv, "total_revenue,{:.2}", report.period.total_revenue)?;
        writeln!(csv, "order_count,{}", report.period.order_count)?;
        writeln!(csv, "average_check,{:.2}", report.average_check.average_check)?;
        writeln!(csv, "min_check,{:.2}", report.average_check.min_check)?;
        writeln!(csv, "max_check,{:.2}", report.average_check.max_check)?;
        writeln!(csv, "median,{:.2}", report.median.median)?;
        writeln!(csv, "percentile_75,{:.2}", report.percentile_75.value)?;
        writeln!(csv, "percentile_95,{:.2}", report.percentile_95.value)?;
        writeln!(csv, "sample_size,{}", report.median.sample_size)?;
        writeln!(csv, "generated_at,{}", report.generated_at.to_rfc3339())?;

        // Add a blank line
        csv.push('\n');

        writeln!(csv, "date,order_count,total_amount")?;
        for day in &report.daily_stats {
            writeln!(csv, "{},{},{:.2}", day.date, day.order_count, day.total_amount)?;
        }

        Ok(csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::{
        AverageCheckStats, DailyOrders, MedianStats, PercentileStats, PeriodSummary, SampleMetric,
    };
    use chrono::NaiveDate;

    fn report() -> SalesReport {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let stat = |percentile, value| PercentileStats {
            metric: SampleMetric::OrderTotal,
            percentile,
            value,
            sample_size: 2,
        };

        SalesReport::new(
            PeriodSummary {
                start_date: day,
                end_date: day,
                total_revenue: 400.0,
                order_count: 2,
            },
            vec![DailyOrders {
                date: day,
                order_count: 2,
                total_amount: 400.0,
            }],
            AverageCheckStats {
                start_date: day,
                end_date: day,
                average_check: 200.0,
                min_check: 100.0,
                max_check: 300.0,
            },
            MedianStats {
                metric: SampleMetric::OrderTotal,
                median: 200.0,
                sample_size: 2,
            },
            stat(75, 250.0),
            stat(95, 290.0),
        )
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
    }

    #[test]
    fn test_render_csv() {
        let bytes = ReportExporter::render(&report(), ExportFormat::Csv).unwrap();
        let csv = String::from_utf8(bytes).unwrap();

        assert!(csv.starts_with("Field,Value\n"));
        assert!(csv.contains("total_revenue,400.00\n"));
        assert!(csv.contains("percentile_75,250.00\n"));
        assert!(csv.contains("date,order_count,total_amount\n2024-01-01,2,400.00\n"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let original = report();
        let bytes = ReportExporter::render(&original, ExportFormat::Json).unwrap();
        let parsed: SalesReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, original);
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        let bytes = ReportExporter::export(&report(), ExportFormat::Csv, &path)
            .await
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_export_to_missing_directory_fails() {
        let result = ReportExporter::export(
            &report(),
            ExportFormat::Json,
            Path::new("/nonexistent/dir/report.json"),
        )
        .await;
        assert!(matches!(result, Err(AnalyticsError::ExportFailed(_))));
    }
}
