//! Benchmarks for overtaking inference

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fuzzy_overtake::reference::{self, OvertakingInputs};
use fuzzy_overtake::{FuzzySystem, Inputs};

fn readings(i: usize) -> OvertakingInputs {
    let t = (i % 100) as f64 / 100.;

    OvertakingInputs {
        distance: 500. * t,
        permission: t,
        lane: 1. - t,
        speed: 100. * t,
        visibility: t,
        bump: 0.,
        crossing: t / 2.,
        level_crossing: 0.,
    }
}

fn build_benchmark(c: &mut Criterion) {
    c.bench_function("build_reference_system", |b| {
        b.iter(|| black_box(reference::overtaking_system()))
    });
}

fn infer_benchmark(c: &mut Criterion) {
    let system = reference::overtaking_system().expect("reference system builds");
    let inputs = readings(50).to_inputs(&system).expect("reference inputs resolve");

    c.bench_function("infer_single", |b| b.iter(|| black_box(system.infer(black_box(&inputs)))));
}

fn batch(system: &FuzzySystem, size: usize) -> Vec<Inputs> {
    (0..size)
        .map(|i| readings(i).to_inputs(system).expect("reference inputs resolve"))
        .collect()
}

fn batch_benchmark(c: &mut Criterion) {
    let system = reference::overtaking_system().expect("reference system builds");
    let mut group = c.benchmark_group("infer_batch");

    for size in [10, 100, 1_000] {
        let requests = batch(&system, size);

        group.bench_with_input(BenchmarkId::new("parallel", size), &requests, |b, requests| {
            b.iter(|| black_box(system.infer_batch(requests)))
        });
        group.bench_with_input(BenchmarkId::new("sequential", size), &requests, |b, requests| {
            b.iter(|| {
                let decisions: Vec<_> = requests.iter().map(|inputs| system.infer(inputs)).collect();
                black_box(decisions)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, build_benchmark, infer_benchmark, batch_benchmark);
criterion_main!(benches);
