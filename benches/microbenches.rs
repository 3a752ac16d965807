//! Criterion microbenches for the curation hot paths.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use std::path::Path;

use tagsplit::data::io_matrix::from_matrix_str;
use tagsplit::data::io_records::{from_records_str, Record};
use tagsplit::data::{ClassId, ImageIndex};
use tagsplit::filter::{nonzero_rows, ValidIndexSet};
use tagsplit::partition::{partition_indices, PartitionOptions, PartitionStrategy};

const VALID_IMAGES: usize = 20_000;
const TRAIN_SIZE: usize = 10_000;

fn valid_set() -> ValidIndexSet {
    (0..VALID_IMAGES * 2)
        .step_by(2)
        .map(ImageIndex::new)
        .collect()
}

fn matrix_text(rows: usize, cols: usize) -> String {
    let mut text = String::with_capacity(rows * cols * 2);
    for r in 0..rows {
        let line: Vec<&str> = (0..cols)
            .map(|c| if (r * 7 + c) % 11 == 0 { "1" } else { "0" })
            .collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

fn records_text(count: usize) -> String {
    (0..count)
        .map(|i| {
            Record {
                index: ImageIndex::new(i),
                path: format!("sunset/{i:04}_{}.jpg", 2_124_494_170 + i),
                labels: vec![ClassId::new(i % 81), ClassId::new((i + 3) % 81)],
                tags: vec!["sky".into(), "clouds".into(), "orange".into()],
            }
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Both strategies over the same 20k-image valid set.
fn bench_partition(c: &mut Criterion) {
    let valid = valid_set();
    let mut group = c.benchmark_group("partition");
    group.throughput(Throughput::Elements(valid.len() as u64));

    for (name, strategy) in [
        ("shuffle", PartitionStrategy::Shuffle),
        ("oversample", PartitionStrategy::Oversample),
    ] {
        let opts = PartitionOptions {
            train_size: TRAIN_SIZE,
            seed: Some(42),
            strategy,
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                let partition = partition_indices(black_box(&valid), &opts).unwrap();
                black_box(partition)
            })
        });
    }

    group.finish();
}

fn bench_validity_filter(c: &mut Criterion) {
    let text = matrix_text(5_000, 81);
    let mut group = c.benchmark_group("validity_filter");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("parse_and_filter", |b| {
        b.iter(|| {
            let matrix = from_matrix_str(black_box(&text), Path::new("<bench>")).unwrap();
            black_box(nonzero_rows(&matrix))
        })
    });

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let text = records_text(5_000);
    let records = from_records_str(&text, Path::new("<bench>")).expect("Failed to parse records");

    let mut group = c.benchmark_group("records");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("from_records_str", |b| {
        b.iter(|| {
            let parsed = from_records_str(black_box(&text), Path::new("<bench>")).unwrap();
            black_box(parsed)
        })
    });

    group.bench_function("format", |b| {
        b.iter(|| {
            let lines: Vec<String> = black_box(&records).iter().map(ToString::to_string).collect();
            black_box(lines)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_partition, bench_validity_filter, bench_records);
criterion_main!(benches);
