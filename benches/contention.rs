//! Benchmarks for trace appends on one error shared across threads.
//!
//! Run with: cargo bench --bench contention

use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use typed_errors::{TraceEntry, TypedError, opt};

const APPENDS_PER_THREAD: usize = 64;

fn entry(line: u32) -> TraceEntry {
    TraceEntry::new("benches/contention.rs", "contention::worker", line)
}

fn bench_shared_appends(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_appends");

    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * APPENDS_PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let err = TypedError::internal([opt::message("fan-out failure")]);
                thread::scope(|s| {
                    for _ in 0..threads {
                        let err = &err;
                        s.spawn(move || {
                            for i in 0..APPENDS_PER_THREAD {
                                err.push_trace(entry(i as u32));
                            }
                        });
                    }
                });
                err
            })
        });
    }

    group.finish();
}

fn bench_read_while_appending(c: &mut Criterion) {
    c.bench_function("report_under_appends", |b| {
        b.iter(|| {
            let err = TypedError::internal([opt::trace(entry(0))]);
            thread::scope(|s| {
                let writer = &err;
                s.spawn(move || {
                    for i in 0..APPENDS_PER_THREAD {
                        writer.push_trace(entry(i as u32));
                    }
                });
                for _ in 0..APPENDS_PER_THREAD {
                    std::hint::black_box(err.report());
                }
            });
            err
        })
    });
}

criterion_group!(benches, bench_shared_appends, bench_read_while_appending);
criterion_main!(benches);
