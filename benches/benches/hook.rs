// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_gadget::context::{GadgetContext, Hand};
use understory_hook::{BoxShape, HookConfig, HookHighlight, SphereShape, StandardHook};

const CYCLE: [HookHighlight; 4] = [
    HookHighlight::InRange,
    HookHighlight::GrabInProgress,
    HookHighlight::Occupied,
    HookHighlight::None,
];

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("hook/render");
    let ctx = GadgetContext::new();

    let Ok(sphere) = StandardHook::new(
        &ctx,
        HookConfig::new("sphere").with_hand(Hand::Left),
        SphereShape::default(),
    ) else {
        return;
    };
    let Ok(boxed) = StandardHook::new(
        &ctx,
        HookConfig::new("box").with_hand(Hand::Left),
        BoxShape::from_bounds(-1.0, 1.0, 0.0, 2.0, -0.5, 0.5),
    ) else {
        return;
    };

    group.bench_function("sphere", |b| {
        let mut i = 0;
        b.iter(|| {
            sphere.update_highlight(CYCLE[i % CYCLE.len()]);
            i += 1;
            black_box(sphere.render())
        });
    });
    group.bench_function("box", |b| {
        let mut i = 0;
        b.iter(|| {
            boxed.update_highlight(CYCLE[i % CYCLE.len()]);
            i += 1;
            black_box(boxed.render())
        });
    });

    group.finish();
}

fn bench_edit_mode_fanout(c: &mut Criterion) {
    let ctx = GadgetContext::new();
    let hooks: Vec<_> = (0..64)
        .filter_map(|i| {
            let hand = if i % 2 == 0 { Hand::Left } else { Hand::Right };
            StandardHook::new(
                &ctx,
                HookConfig::new(format!("hook{i}")).with_hand(hand),
                SphereShape::default(),
            )
            .ok()
        })
        .collect();

    c.bench_function("hook/edit_mode_fanout(64)", |b| {
        let mut on = false;
        b.iter(|| {
            on = !on;
            ctx.set_edit_mode(Hand::Left, on);
        });
    });
    black_box(hooks.len());
}

criterion_group!(benches, bench_render, bench_edit_mode_fanout);
criterion_main!(benches);
