use criterion::{Criterion, criterion_group, criterion_main};
use ration::{Clock, ManualClock, QuantaClock, StdClock, TokioClock};

fn time_single_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("clocks");
    group
        .sample_size(100)
        .bench_function("std-clock-now", |b| {
            let clock = StdClock::default();
            b.iter(|| clock.now());
        })
        .bench_function("quanta-clock-now", |b| {
            let clock = QuantaClock::default();
            b.iter(|| clock.now());
        })
        .bench_function("tokio-clock-now", |b| {
            let clock = TokioClock::default();
            b.iter(|| clock.now());
        })
        .bench_function("manual-clock-now", |b| {
            let clock = ManualClock::default();
            b.iter(|| clock.now());
        });
    group.finish();
}

criterion_group!(time_benches, time_single_threaded);
criterion_main!(time_benches);
