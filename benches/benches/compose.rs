// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::borrow::Cow;
use std::cell::Cell;
use std::rc::Rc;
use understory_compose::{
    ComposedEntity, ComposedEntityDescription, CompositionConfig, EndpointAddr, EntityComponent,
    InitialInterfaceLock, InterfaceProp, SharedComponent, SpatialEntity, compose,
};
use understory_gadget::context::GadgetContext;
use understory_gadget::geometry::Volume;
use understory_gadget::signal::{Subscription, UpdateHandler, UpdateNotifier};

struct Behavior {
    transmits: Vec<InterfaceProp>,
    receives: Vec<InterfaceProp>,
    locks: Vec<InitialInterfaceLock>,
    parent: Option<EndpointAddr>,
    wants_transforms: Cell<bool>,
    notifier: UpdateNotifier,
}

impl Behavior {
    fn new(i: u32) -> Self {
        Self {
            transmits: vec![InterfaceProp::new("aardvark-grab@1")],
            receives: vec![InterfaceProp::new("aardvark-highlight@1")],
            locks: if i % 4 == 0 {
                vec![InitialInterfaceLock::new(
                    "aardvark-container@1",
                    EndpointAddr::node(1, i),
                )]
            } else {
                Vec::new()
            },
            parent: (i % 3 == 2).then(|| EndpointAddr::node(2, i)),
            wants_transforms: Cell::new(false),
            notifier: UpdateNotifier::new(),
        }
    }
}

impl EntityComponent for Behavior {
    fn transmits(&self) -> Cow<'_, [InterfaceProp]> {
        Cow::Borrowed(&self.transmits)
    }

    fn receives(&self) -> Cow<'_, [InterfaceProp]> {
        Cow::Borrowed(&self.receives)
    }

    fn interface_locks(&self) -> Cow<'_, [InitialInterfaceLock]> {
        Cow::Borrowed(&self.locks)
    }

    fn parent(&self) -> Option<EndpointAddr> {
        self.parent
    }

    fn wants_transforms(&self) -> bool {
        self.wants_transforms.get()
    }

    fn on_update(&self, handler: UpdateHandler) -> Subscription {
        self.notifier.subscribe(handler)
    }
}

struct Discard;

impl SpatialEntity for Discard {
    fn publish(&mut self, description: &ComposedEntityDescription) {
        black_box(description);
    }

    fn global_id(&self) -> Option<EndpointAddr> {
        None
    }
}

fn behaviors(len: u32) -> Vec<Rc<Behavior>> {
    (0..len).map(|i| Rc::new(Behavior::new(i))).collect()
}

fn erase(behaviors: &[Rc<Behavior>]) -> Vec<SharedComponent> {
    behaviors
        .iter()
        .map(|b| -> SharedComponent { b.clone() })
        .collect()
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose/merge");
    let config = CompositionConfig::new(Volume::sphere(0.1));

    for len in [1u32, 4, 16, 64] {
        let components = behaviors(len);
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &components, |b, cs| {
            b.iter(|| black_box(compose(cs.iter().map(|c| &**c), &config)));
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose/update");

    // One notification: compose, publish, and re-register with every component.
    for len in [1u32, 4, 16, 64] {
        let components = behaviors(len);
        let ctx = GadgetContext::new();
        let entity = ComposedEntity::new(
            &ctx,
            erase(&components),
            CompositionConfig::new(Volume::Infinite),
            Discard,
        );
        let last = components.last().map(Rc::clone);
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter(|| {
                if let Some(last) = &last {
                    last.wants_transforms.set(!last.wants_transforms.get());
                    last.notifier.notify();
                }
            });
        });
        black_box(entity.revision());
    }

    group.finish();
}

fn bench_set_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose/set_components");

    for len in [4u32, 64] {
        let components = behaviors(len);
        let ctx = GadgetContext::new();
        group.bench_function(BenchmarkId::from_parameter(len), |b| {
            b.iter_batched(
                || {
                    ComposedEntity::new(
                        &ctx,
                        Vec::new(),
                        CompositionConfig::new(Volume::Infinite),
                        Discard,
                    )
                },
                |mut entity| {
                    entity.set_components(erase(&components));
                    black_box(entity);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compose, bench_update, bench_set_components);
criterion_main!(benches);
