//! Benchmark – appending to an `sds::Sds`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sds::{GrowthOptions, Sds};

/// Append `chunk` to a fresh string `count` times and return the final length
/// so Criterion cannot optimise the loop away.
fn append_chunks(chunk: &[u8], count: usize, opts: &GrowthOptions) -> usize {
    let mut s = Sds::empty().unwrap();
    for _ in 0..count {
        s.make_room_for_with(chunk.len(), opts).unwrap();
        s.cat_len(chunk).unwrap();
    }
    s.len()
}

fn bench_cat(c: &mut Criterion) {
    let mut group = c.benchmark_group("cat_len");

    for &chunk_len in &[1usize, 16, 1_024] {
        let chunk = vec![b'a'; chunk_len];
        let count = (1 << 20) / chunk_len;
        for (name, opts) in [
            ("default", GrowthOptions::default()),
            ("no_prealloc", GrowthOptions::new(0)),
        ] {
            group.bench_with_input(
                BenchmarkId::new(chunk_len.to_string(), name),
                &opts,
                |b, opts| {
                    b.iter(|| black_box(append_chunks(black_box(&chunk), count, opts)));
                },
            );
        }
    }

    group.finish();
}

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");

    group.bench_function("cat_fmt", |b| {
        b.iter(|| {
            let mut s = Sds::empty().unwrap();
            for i in 0..1_000i64 {
                sds::cat_fmt!(s, "%s:%I,", black_box("key"), black_box(i)).unwrap();
            }
            black_box(s.len())
        });
    });

    group.bench_function("cat_printf", |b| {
        b.iter(|| {
            let mut s = Sds::empty().unwrap();
            for i in 0..1_000i64 {
                sds::cat_printf!(s, "{}:{},", black_box("key"), black_box(i)).unwrap();
            }
            black_box(s.len())
        });
    });

    group.bench_function("from_longlong", |b| {
        b.iter(|| {
            let mut total = 0;
            for i in 0..1_000i64 {
                total += Sds::from_longlong(black_box(i)).unwrap().len();
            }
            black_box(total)
        });
    });

    group.finish();
}

fn criterion() -> Criterion {
    let c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c.warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10)
    } else {
        c.warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5))
    }
}

criterion_group! { name = benches; config = criterion(); targets = bench_cat, bench_formatters }
criterion_main!(benches);
