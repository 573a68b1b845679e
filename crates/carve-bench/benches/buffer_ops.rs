//! Criterion micro-benchmarks for the append buffer.

use carve_buf::AppendBuffer;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Benchmark: 1K small appends starting from the default capacity.
fn bench_append_1k(c: &mut Criterion) {
    c.bench_function("buffer_append_1k", |b| {
        b.iter(|| {
            let mut buf = AppendBuffer::new();
            for _ in 0..1_000 {
                buf.write("token ").unwrap();
            }
            black_box(buf.len());
        });
    });
}

/// Benchmark: formatted appends into a reused buffer.
fn bench_formatted_reuse(c: &mut Criterion) {
    let mut buf = AppendBuffer::with_capacity(16 * 1024);
    c.bench_function("buffer_formatted_reuse_256", |b| {
        b.iter(|| {
            buf.clear();
            for i in 0..256u32 {
                buf.write_formatted(format_args!("{i:>6}:{:08x};", i * 31))
                    .unwrap();
            }
            black_box(buf.as_str().len());
        });
    });
}

criterion_group!(benches, bench_append_1k, bench_formatted_reuse);
criterion_main!(benches);
