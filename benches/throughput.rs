use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ration::{Limit, ManualClock, QuantaClock, StdClock, TokenBucket};

const CAPACITY: u32 = 1_000_000;

fn limit() -> Limit {
    Limit::new(CAPACITY, CAPACITY, Duration::from_millis(1)).unwrap()
}

fn bench_consume(c: &mut Criterion) {
    let std_tb = TokenBucket::from_parts(limit(), CAPACITY, StdClock::default());
    let quanta_tb = TokenBucket::from_parts(limit(), CAPACITY, QuantaClock::default());
    let mut group = c.benchmark_group("tokenbucket");
    group
        .throughput(Throughput::Elements(1))
        .sample_size(100)
        .bench_function("consume-now-manual-clock", |b| {
            let clock = ManualClock::default();
            let tb = TokenBucket::from_parts(limit(), CAPACITY, &clock);
            let mut now = 0.0;
            b.iter(|| {
                // keep the bucket topped up
                now += 0.002;
                clock.set(now);
                let _x = std::hint::black_box(tb.consume_now(1));
            });
        })
        .bench_function("consume-now-std-clock", |b| {
            b.iter(|| {
                let _x = std::hint::black_box(std_tb.consume_now(1));
            });
        })
        .bench_function("consume-now-quanta-clock", |b| {
            b.iter(|| {
                let _x = std::hint::black_box(quanta_tb.consume_now(1));
            });
        })
        .bench_function("available-std-clock", |b| {
            b.iter(|| std::hint::black_box(std_tb.available()));
        });
    group.finish();
}

const THREADS: u32 = 8;

fn multi_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_threaded");
    group
        .throughput(Throughput::Elements(1))
        .bench_function("consume-now", |b| {
            let tb = Arc::new(TokenBucket::from_parts(
                limit(),
                CAPACITY,
                QuantaClock::default(),
            ));
            b.iter_custom(|iters| {
                let mut children = vec![];
                let start = std::time::Instant::now();
                for _i in 0..THREADS {
                    let tb = Arc::clone(&tb);
                    children.push(std::thread::spawn(move || {
                        for _i in 0..iters {
                            let _x = std::hint::black_box(tb.consume_now(1));
                        }
                    }));
                }
                for child in children {
                    child.join().unwrap()
                }
                start.elapsed()
            })
        })
        .bench_function("try-consume-contended", |b| {
            // small capacity so that threads actually wait on each other
            let limit = Limit::new(64, 64, Duration::from_micros(100)).unwrap();
            let tb = Arc::new(TokenBucket::from_parts(limit, 64, StdClock::default()));
            b.iter_custom(|iters| {
                let mut children = vec![];
                let start = std::time::Instant::now();
                for _i in 0..THREADS {
                    let tb = Arc::clone(&tb);
                    children.push(std::thread::spawn(move || {
                        for _i in 0..iters {
                            let _x = std::hint::black_box(
                                tb.try_consume(1, Duration::from_millis(1)),
                            );
                        }
                    }));
                }
                for child in children {
                    child.join().unwrap()
                }
                start.elapsed()
            })
        });
    group.finish();
}

criterion_group!(benches, bench_consume, multi_threaded);
criterion_main!(benches);
