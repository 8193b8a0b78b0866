use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gf2barrier::{
    enumerate_codewords, tensor_codeword, tensor_parity_check, BarrierEngine, BitMatrix,
    BitVector, Landscape, SearchConfig, StoreKind,
};
use rand::{rngs::SmallRng, SeedableRng};
use std::hint::black_box;

fn cyclic(n: usize) -> BitMatrix {
    BitMatrix::build(n, n, |i, j| j == i || j == (i + 1) % n)
}

fn bench_rref(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    let h = BitMatrix::random(&mut rng, 200, 400);
    c.bench_function("rref_200x400", |b| b.iter(|| black_box(&h).reduced()));
}

fn bench_energy(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(2);
    let h = BitMatrix::random(&mut rng, 64, 256);
    let x = BitVector::random(&mut rng, 256);
    let land = Landscape::new(&h);
    c.bench_function("energy_64x256", |b| {
        b.iter(|| gf2barrier::energy(black_box(&h), black_box(&x)))
    });
    c.bench_function("landscape_flip_64x256", |b| {
        let mut s = land.syndrome_of(&x);
        let mut bit = 0;
        b.iter(|| {
            bit = (bit + 1) % 256;
            land.flip(&mut s, bit)
        })
    });
}

fn bench_barrier(c: &mut Criterion) {
    let mut group = c.benchmark_group("barrier");
    for n in [8, 12, 16] {
        let h = cyclic(n);
        let target = BitVector::build(n, |_| true);
        for (engine, name) in [
            (BarrierEngine::BestFirst, "best_first"),
            (BarrierEngine::Exhaustive, "exhaustive"),
        ] {
            for store in [StoreKind::Hash, StoreKind::Dense] {
                let config = SearchConfig::default().with_store(store);
                let id = BenchmarkId::new(format!("{name}/{store:?}"), n);
                group.bench_with_input(id, &n, |b, _| {
                    b.iter(|| engine.barrier(&h, &target, &config))
                });
            }
        }
    }
    group.finish();
}

fn bench_short_walk_24(c: &mut Criterion) {
    let h = BitMatrix::zeros(2, 24);
    let target = BitVector::build(24, |i| i == 23);
    let mut group = c.benchmark_group("short_walk_24");
    for store in [StoreKind::Auto, StoreKind::Hash, StoreKind::Dense] {
        let config = SearchConfig::default().with_store(store);
        group.bench_function(format!("{store:?}"), |b| {
            b.iter(|| BarrierEngine::BestFirst.barrier(&h, black_box(&target), &config))
        });
    }
    group.finish();
}

fn bench_tensor_barrier(c: &mut Criterion) {
    let h = cyclic(3);
    let h3 = tensor_parity_check(&h, &h);
    let words = enumerate_codewords(&h).unwrap();
    let c3 = tensor_codeword(&words[1], &words[1]);
    let config = SearchConfig::default();
    c.bench_function("tensor_cyclic3_best_first", |b| {
        b.iter(|| BarrierEngine::BestFirst.barrier(&h3, &c3, &config))
    });
}

criterion_group!(
    benches,
    bench_rref,
    bench_energy,
    bench_barrier,
    bench_short_walk_24,
    bench_tensor_barrier
);
criterion_main!(benches);
