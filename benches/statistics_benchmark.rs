// Analytics Performance Benchmarks
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sales_analytics::analytics::{
    daily_series, percentile, AnalyticsEngine, DateRange, Percentile, Sample, SampleMetric,
};
use sales_analytics::ledger::InMemoryLedger;
use sales_analytics::models::Order;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Deterministic orders spread over `days` days
fn synthetic_orders(count: usize, days: u64) -> Vec<Order> {
    (0..count)
        .map(|i| {
            let day = start() + chrono::Days::new(i as u64 % days);
            let amount = ((i * 7919) % 10_000) as f64 / 10.0;
            Order::new((i % 500) as i64, day, amount)
        })
        .collect()
}

fn percentile_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("percentile_interpolation");

    for size in [100, 10_000, 100_000].iter() {
        let values: Vec<f64> = synthetic_orders(*size, 30)
            .iter()
            .map(|o| o.total_amount)
            .collect();
        let sample = Sample::new(SampleMetric::OrderTotal, values).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &sample, |b, sample| {
            b.iter(|| percentile(black_box(sample.values()), black_box(95.0)));
        });
    }

    group.finish();
}

fn sample_construction(c: &mut Criterion) {
    let values: Vec<f64> = synthetic_orders(100_000, 30)
        .iter()
        .map(|o| o.total_amount)
        .collect();

    c.bench_function("sample_sort_100k", |b| {
        b.iter(|| Sample::new(SampleMetric::OrderTotal, black_box(values.clone())).unwrap());
    });
}

fn daily_partitioning(c: &mut Criterion) {
    let orders = synthetic_orders(50_000, 365);
    let range = DateRange::new(start(), start() + chrono::Days::new(364)).unwrap();

    c.bench_function("daily_series_year_50k", |b| {
        b.iter(|| daily_series(black_box(&range), black_box(&orders)).unwrap());
    });
}

fn report_generation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let ledger = InMemoryLedger::with_orders(synthetic_orders(20_000, 90)).unwrap();
    let engine = AnalyticsEngine::with_defaults(Arc::new(ledger));
    let range = DateRange::new(start(), start() + chrono::Days::new(89)).unwrap();

    c.bench_function("generate_report_90_days", |b| {
        b.to_async(&rt)
            .iter(|| async { engine.generate_report(&range).await.unwrap() });
    });

    c.bench_function("orders_percentile_p95", |b| {
        b.to_async(&rt).iter(|| async {
            engine
                .orders_percentile(&range, Percentile::P95)
                .await
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    percentile_interpolation,
    sample_construction,
    daily_partitioning,
    report_generation
);
criterion_main!(benches);
