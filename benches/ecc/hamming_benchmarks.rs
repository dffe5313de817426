use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecc_kernel::cs::ecc::{hamming_decode_bytes, hamming_encode_bytes, HammingCodec, Payload};

fn bench_hamming(c: &mut Criterion) {
    let codec = HammingCodec::new();
    let payloads: Vec<Payload> = (0u8..16).map(Payload::from_nibble).collect();
    let codewords: Vec<_> = payloads.iter().map(|p| codec.encode(p)).collect();

    c.bench_function("hamming_7_4_encode_all", |b| {
        b.iter(|| {
            for payload in &payloads {
                black_box(codec.encode(black_box(payload)));
            }
        })
    });

    c.bench_function("hamming_7_4_decode_single_errors", |b| {
        b.iter(|| {
            for codeword in &codewords {
                for index in 0..7 {
                    let damaged = codeword.flip_bit(index).unwrap();
                    black_box(codec.decode(black_box(&damaged)));
                }
            }
        })
    });

    let data = vec![0xA5u8; 4096];
    let encoded = hamming_encode_bytes(&data);
    c.bench_function("hamming_7_4_bytes_encode", |b| {
        b.iter(|| hamming_encode_bytes(black_box(&data)))
    });

    c.bench_function("hamming_7_4_bytes_decode", |b| {
        b.iter(|| hamming_decode_bytes(black_box(&encoded)))
    });
}

criterion_group!(benches, bench_hamming);
criterion_main!(benches);
