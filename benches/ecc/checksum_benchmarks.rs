use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ecc_kernel::cs::ecc::{ChecksumConfig, ChecksumEngine};
use rand::{distributions::Alphanumeric, Rng};

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("additive_checksum");
    for size in [64usize, 4096, 65536] {
        let message: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(size)
            .map(char::from)
            .collect();
        for width in [8u32, 16, 32] {
            let engine = ChecksumEngine::new(ChecksumConfig::new(width, 0).unwrap());
            group.bench_with_input(
                BenchmarkId::new(format!("{}-bit", width), size),
                &message,
                |b, message| b.iter(|| engine.compute(black_box(message))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_checksum);
criterion_main!(benches);
