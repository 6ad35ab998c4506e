// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::cell::Cell;
use std::rc::Rc;
use understory_gadget::signal::Listeners;

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal/emit");

    for len in [1usize, 16, 256] {
        let listeners = Listeners::<u32>::new();
        let total = Rc::new(Cell::new(0_u64));
        let subscriptions: Vec<_> = (0..len)
            .map(|_| {
                let total = total.clone();
                listeners.subscribe(move |v| total.set(total.get() + u64::from(*v)))
            })
            .collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter(|| black_box(listeners.emit(&1)));
        });
        drop(subscriptions);
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal/subscribe_release");

    // Slot reuse: subscribe and drop repeatedly against a fixed population.
    for len in [16usize, 256] {
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter_batched(
                || {
                    let listeners = Listeners::<u32>::new();
                    let base: Vec<_> = (0..len).map(|_| listeners.subscribe(|_| {})).collect();
                    (listeners, base)
                },
                |(listeners, base)| {
                    for _ in 0..len {
                        let sub = listeners.subscribe(|v| {
                            black_box(v);
                        });
                        drop(sub);
                    }
                    black_box((listeners, base));
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_emit, bench_churn);
criterion_main!(benches);
