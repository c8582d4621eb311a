//! Pipeline benchmark: normalized trades → windowed stats → temporal gaps.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use insider_features::features::{FeaturePipeline, TemporalGapEngine, WindowedStatsEngine};
use insider_features::normalize::{NormalizedTrades, TradeRecord, TransactionType};
use insider_features::PipelineConfig;

fn make_dummy_trades(tickers: usize, per_ticker: usize) -> NormalizedTrades {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut records = Vec::with_capacity(tickers * per_ticker);
    for t in 0..tickers {
        for i in 0..per_ticker {
            let kind = if i % 4 == 0 { TransactionType::Sell } else { TransactionType::Buy };
            let shares = (100 + (i * 37 + t * 11) % 900) as f64;
            let price = 5.0 + (i % 13) as f64;
            records.push(
                TradeRecord::new(format!("T{t:03}"), start + Duration::days((i * 3 % 365) as i64), kind, shares, price)
                    .with_actor(format!("insider_{}", i % 7))
                    .with_relationship(if i % 2 == 0 { "Director" } else { "CFO" }),
            );
        }
    }
    NormalizedTrades::from_records(records)
}

fn bench_windowed_stats(c: &mut Criterion) {
    let frame = make_dummy_trades(50, 200).to_frame().unwrap();
    let engine = WindowedStatsEngine::new();

    c.bench_function("windowed_stats_10k_rows", |b| {
        b.iter(|| black_box(engine.compute(black_box(&frame)).unwrap()))
    });
}

fn bench_temporal_gaps(c: &mut Criterion) {
    let frame = make_dummy_trades(50, 200).to_frame().unwrap();
    let engine = TemporalGapEngine::new();

    c.bench_function("temporal_gaps_10k_rows", |b| {
        b.iter(|| black_box(engine.compute(black_box(&frame)).unwrap()))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let trades = make_dummy_trades(50, 200);
    let pipeline = FeaturePipeline::new(PipelineConfig::default());

    c.bench_function("full_pipeline_trades_to_matrix", |b| {
        b.iter(|| black_box(pipeline.assemble(black_box(&trades)).unwrap()))
    });
}

criterion_group!(benches, bench_windowed_stats, bench_temporal_gaps, bench_full_pipeline);
criterion_main!(benches);
