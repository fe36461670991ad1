use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use foundation_sync::{CyclicBarrier, Semaphore};
use foundation_testing::scenarios::{run_phased, PhasedConfig};

/// A single-party barrier never blocks, so this is the bookkeeping cost.
fn bench_barrier_single_party(c: &mut Criterion) {
    let barrier = CyclicBarrier::new(1);

    c.bench_function("barrier_wait_single_party", |b| {
        b.iter(|| black_box(barrier.wait().unwrap()));
    });
}

/// Rounds per iteration with a growing number of parties.
fn bench_barrier_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("barrier_rounds");
    group.sample_size(20);

    for parties in [2usize, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(parties),
            &parties,
            |b, &parties| {
                let config = PhasedConfig::new().parties(parties).rounds(100);
                b.iter(|| black_box(run_phased(config).unwrap().final_generation));
            },
        );
    }

    group.finish();
}

/// Uncontended semaphore acquire and release.
fn bench_semaphore_uncontended(c: &mut Criterion) {
    let pool = Semaphore::new(1);

    c.bench_function("semaphore_acquire_release_uncontended", |b| {
        b.iter(|| drop(black_box(pool.acquire())));
    });
}

criterion_group!(
    benches,
    bench_barrier_single_party,
    bench_barrier_rounds,
    bench_semaphore_uncontended
);
criterion_main!(benches);
