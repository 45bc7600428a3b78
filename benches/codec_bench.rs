// benches/codec_bench.rs
//! Benchmarks for column encoding and response classification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use monday_cli::{classify, encode, Column, ColumnType, RawOutcome, StatusOption};
use serde_json::json;

fn status_column(labels: usize) -> Column {
    let options = (0..labels)
        .map(|index| StatusOption {
            index: index as i64,
            label: format!("Label {}", index),
        })
        .collect();
    Column::new("status", "Status", ColumnType::Status).with_options(options)
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_status");
    for labels in [5, 20, 100] {
        let column = status_column(labels);
        let wanted = format!("label {}", labels - 1);
        group.bench_with_input(BenchmarkId::from_parameter(labels), &labels, |b, _| {
            b.iter(|| encode(black_box(&column), black_box(&wanted)))
        });
    }
    group.finish();

    let date = Column::new("date4", "Due", ColumnType::Date);
    c.bench_function("encode_date", |b| {
        b.iter(|| encode(black_box(&date), black_box("2024-12-31")))
    });
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_page");
    for items in [10, 100, 500] {
        let body = json!({
            "data": {
                "boards": [{
                    "items_page": {
                        "cursor": "abc",
                        "items": (0..items)
                            .map(|id| json!({ "id": id.to_string(), "name": "Task" }))
                            .collect::<Vec<_>>()
                    }
                }],
                "complexity": { "before": 5000000, "after": 4990000 }
            }
        });
        let outcome = RawOutcome::ok_json(&body);
        group.bench_with_input(BenchmarkId::from_parameter(items), &outcome, |b, outcome| {
            b.iter(|| classify(black_box(outcome.clone())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_classify);
criterion_main!(benches);
