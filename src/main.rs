use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sales_analytics::{
    analytics::{AnalyticsEngine, AnalyticsQuery, DateRange, ExportFormat, ReportExporter},
    config::Config,
    ledger::create_ledger,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "sales-analytics")]
#[command(about = "Sales analytics over an order ledger", version, long_about = None)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    format: ExportFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Dump Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct RangeArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(short, long)]
    start: String,

    /// Last day of the period, inclusive (YYYY-MM-DD)
    #[arg(short, long)]
    end: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleKind {
    /// Individual order totals
    Orders,
    /// Summed spend per customer
    Customers,
}

#[derive(Subcommand)]
enum Commands {
    /// Total revenue and order count
    Revenue(RangeArgs),

    /// Order count and amount for every day of the period
    Daily(RangeArgs),

    /// Average, smallest and largest check
    AverageCheck(RangeArgs),

    /// Median of order totals or customer spend
    Median {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(short, long, value_enum, default_value = "orders")]
        metric: SampleKind,
    },

    /// Percentile of order totals or customer spend
    Percentile {
        #[command(flatten)]
        range: RangeArgs,

        /// Percentile between 0 and 100
        #[arg(short, long)]
        percentile: i64,

        #[arg(short, long, value_enum, default_value = "orders")]
        metric: SampleKind,
    },

    /// Full sales report
    Report(RangeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&config);
    tracing::info!("Starting sales analytics v{}", env!("CARGO_PKG_VERSION"));

    config.analytics.validate()?;

    if config.observability.prometheus_enabled {
        if let Err(e) = sales_analytics::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
        }
    }

    tracing::info!("Ledger backend: {:?}", config.ledger.backend);
    let ledger = create_ledger(&config.ledger)
        .await
        .context("Failed to initialize ledger")?;
    let engine = AnalyticsEngine::new(ledger, config.analytics.clone());

    let bytes = run(&engine, &cli).await?;

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Result written");
        }
        None => println!("{}", String::from_utf8_lossy(&bytes).trim_end()),
    }

    if cli.metrics {
        eprintln!("{}", sales_analytics::metrics::gather_metrics());
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sales_analytics={}", config.observability.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the result, logs go to stderr
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn parse_range(args: &RangeArgs) -> anyhow::Result<DateRange> {
    let query = AnalyticsQuery::new(&args.start, &args.end);
    let range = query.range()?;
    query.validate()?;
    Ok(range)
}

async fn run(engine: &AnalyticsEngine, cli: &Cli) -> anyhow::Result<Vec<u8>> {
    let format = cli.format;

    match &cli.command {
        Commands::Revenue(args) => {
            let summary = engine.revenue_summary(&parse_range(args)?).await?;
            render(&summary, format)
        }

        Commands::Daily(args) => {
            let days = engine.daily_order_counts(&parse_range(args)?).await?;
            match format {
                ExportFormat::Json => render(&days, format),
                ExportFormat::Csv => {
                    let mut csv = String::from("date,order_count,total_amount\n");
                    for day in &days {
                        csv.push_str(&format!(
                            "{},{},{:.2}\n",
                            day.date, day.order_count, day.total_amount
                        ));
                    }
                    Ok(csv.into_bytes())
                }
            }
        }

        Commands::AverageCheck(args) => {
            let stats = engine.average_check(&parse_range(args)?).await?;
            render(&stats, format)
        }

        Commands::Median { range, metric } => {
            let range = parse_range(range)?;
            let stats = match metric {
                SampleKind::Orders => engine.orders_median(&range).await?,
                SampleKind::Customers => engine.customer_spending_median(&range).await?,
            };
            render(&stats, format)
        }

        Commands::Percentile {
            range,
            percentile,
            metric,
        } => {
            let query =
                AnalyticsQuery::new(&range.start, &range.end).with_percentile(*percentile);
            let (range, p) = (query.range()?, query.percentile()?);
            query.validate()?;

            let stats = match metric {
                SampleKind::Orders => engine.orders_percentile(&range, p).await?,
                SampleKind::Customers => engine.customer_spending_percentile(&range, p).await?,
            };
            render(&stats, format)
        }

        Commands::Report(args) => {
            let report = engine.generate_report(&parse_range(args)?).await?;
            tracing::info!("{}", report.headline());
            Ok(ReportExporter::render(&report, format)?)
        }
    }
}

/// Pretty JSON, or a two-column `Field,Value` table for flat values
fn render<T: Serialize>(value: &T, format: ExportFormat) -> anyhow::Result<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(value)?),
        ExportFormat::Csv => {
            let json = serde_json::to_value(value)?;
            let object = json
                .as_object()
                .context("CSV output needs a flat record")?;

            let mut csv = String::from("Field,Value\n");
            for (field, value) in object {
                match value {
                    serde_json::Value::String(s) => csv.push_str(&format!("{},{}\n", field, s)),
                    other => csv.push_str(&format!("{},{}\n", field, other)),
                }
            }
            Ok(csv.into_bytes())
        }
    }
}
