//! Benchmarks for wildscan streaming matching.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wildscan::{FrozenScanner, Scanner};

/// Deterministic pseudo-text: lowercase letters with enough repetition to
/// exercise fallback chains.
fn synth_corpus(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut x: u32 = 0x2545_F491;
    for _ in 0..len {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        out.push(b'a' + (x % 26) as u8);
    }
    out
}

fn bench_compile(c: &mut Criterion) {
    let pattern: &[u8] = b"abra?ad?bra??cad?abra";
    c.bench_function("compile", |b| {
        b.iter(|| Scanner::compile(black_box(pattern)))
    });
}

fn bench_stream_sparse_hits(c: &mut Criterion) {
    let corpus = synth_corpus(64 * 1024);
    let scanner = Scanner::compile(b"qu?ck");
    c.bench_function("stream_sparse_hits", |b| {
        b.iter(|| scanner.find_all(black_box(&corpus)))
    });
}

fn bench_stream_dense_hits(c: &mut Criterion) {
    // Every byte terminates a subpattern and extends live chains.
    let corpus = vec![b'a'; 64 * 1024];
    let scanner = Scanner::compile(b"aa?aa");
    c.bench_function("stream_dense_hits", |b| {
        b.iter(|| scanner.find_all(black_box(&corpus)))
    });
}

fn bench_frozen_stream(c: &mut Criterion) {
    let corpus = synth_corpus(64 * 1024);
    let frozen = FrozenScanner::compile(b"ab?cd??ef");
    c.bench_function("frozen_stream", |b| {
        b.iter(|| frozen.find_all(black_box(&corpus)))
    });
}

criterion_group!(
    benches,
    bench_compile,
    bench_stream_sparse_hits,
    bench_stream_dense_hits,
    bench_frozen_stream
);
criterion_main!(benches);
