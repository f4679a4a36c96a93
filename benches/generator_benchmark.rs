//! Benchmark synthetic generation and labelling
//!
//! Run with: cargo bench --bench generator_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use sla_lens::pipeline::{
    add_total_time, assign_concern, generate_transactions, FieldGroup, FieldKind, PipelineConfig,
};

/// Scenario with `n_groups` groups of three steps, the last step of each faulty
fn wide_config(transactions: usize, n_groups: usize) -> PipelineConfig {
    let groups = (0..n_groups)
        .map(|i| {
            FieldGroup::new(
                format!("component_{}", i + 1),
                vec![FieldKind::Clean, FieldKind::Clean, FieldKind::Faulty],
            )
        })
        .collect();

    PipelineConfig {
        transactions,
        groups,
        ..PipelineConfig::sla_scenario()
    }
}

/// Generation for varying row counts
fn benchmark_generate_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_by_rows");
    group.sample_size(20);

    for n_rows in [1_000, 10_000, 100_000] {
        let config = wide_config(n_rows, 2);
        group.throughput(Throughput::Elements(n_rows as u64));

        group.bench_with_input(BenchmarkId::new("generate", n_rows), &config, |b, config| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                let _ = generate_transactions(black_box(config), &mut rng);
            });
        });
    }

    group.finish();
}

/// Aggregate and label for varying step counts
fn benchmark_label_by_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_by_width");
    group.sample_size(20);

    for n_groups in [2, 10, 50] {
        let config = wide_config(10_000, n_groups);
        let mut rng = StdRng::seed_from_u64(42);
        let df = generate_transactions(&config, &mut rng).expect("Failed to generate dataset");
        let names = config.step_names();

        group.throughput(Throughput::Elements((n_groups * 3) as u64));
        group.bench_with_input(
            BenchmarkId::new("total_and_concern", n_groups * 3),
            &(&df, &names),
            |b, (df, names)| {
                b.iter(|| {
                    let labelled = add_total_time((*df).clone(), names)
                        .and_then(|df| assign_concern(df, 5.0));
                    let _ = black_box(labelled);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_generate_by_rows, benchmark_label_by_width);
criterion_main!(benches);
