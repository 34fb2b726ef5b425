//! Benchmarks for CSParve64 operations.
//!
//! Measures instance creation, the combined keyed hash, and in-place
//! encode/decode throughput across buffer sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use csparve64::{Context, CsParve64};

/// Input key used consistently across all benchmarks.
const BENCH_KEY: [u8; 8] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77];

/// Buffer sizes exercised by the throughput benchmarks.
const SIZES: &[usize] = &[64, 1024, 16 * 1024];

fn bench_context() -> Context {
    let mut config = [0u32; 20];
    for (i, word) in config.iter_mut().enumerate().skip(1) {
        *word = (i as u32).wrapping_mul(0x9E37_79B9);
    }
    let mut sbox = [0u8; 256];
    for (i, s) in sbox.iter_mut().enumerate() {
        *s = (i as u8).wrapping_mul(167).wrapping_add(43);
    }
    Context::open(&config, &sbox).unwrap()
}

/// Benchmarks `CsParve64::create` over a 64-byte seed.
///
/// Covers the full derivation path: Parve CBC-MAC of the seed,
/// chain-&-sum key setup with three modular inversions, and the cached
/// seed hash.
fn bench_create(c: &mut Criterion) {
    let context = bench_context();
    let seed = [0x5Au8; 64];

    c.bench_function("create_instance", |b| {
        b.iter(|| CsParve64::create(&context, black_box(&BENCH_KEY), black_box(&seed)).unwrap());
    });
}

/// Benchmarks the combined keyed hash across buffer sizes.
fn bench_compute_hash(c: &mut Criterion) {
    let context = bench_context();

    let mut group = c.benchmark_group("compute_hash");
    for &size in SIZES {
        let data: Vec<u8> = (0..size).map(|i| i as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| context.compute_hash(black_box(&BENCH_KEY), black_box(data)).unwrap());
        });
    }
    group.finish();
}

/// Benchmarks in-place encryption across buffer sizes.
fn bench_encode(c: &mut Criterion) {
    let context = bench_context();
    let instance = CsParve64::create(&context, &BENCH_KEY, &[0u8; 16]).unwrap();

    let mut group = c.benchmark_group("encode");
    for &size in SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut buffer: Vec<u8> = (0..size).map(|i| i as u8).collect();
            b.iter(|| instance.encode(black_box(&mut buffer)).unwrap());
        });
    }
    group.finish();
}

/// Benchmarks in-place decryption across buffer sizes.
fn bench_decode(c: &mut Criterion) {
    let context = bench_context();
    let instance = CsParve64::create(&context, &BENCH_KEY, &[0u8; 16]).unwrap();

    let mut group = c.benchmark_group("decode");
    for &size in SIZES {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut buffer: Vec<u8> = (0..size).map(|i| i as u8).collect();
            instance.encode(&mut buffer).unwrap();
            b.iter(|| instance.decode(black_box(&mut buffer)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_compute_hash,
    bench_encode,
    bench_decode,
);
criterion_main!(benches);
