// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch draining throughput with and without pool reuse.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use understory_dispatch::accumulate::Accumulated;
use understory_dispatch::batch::{BatchConfig, BatchRunner};
use understory_dispatch::event::SyntheticEvent;
use understory_dispatch::types::{IdentityHost, Listener, listener};

type Runner = BatchRunner<u32, IdentityHost>;

fn fill(runner: &mut Runner, events: usize, depth: u32, l: &Listener<u32, u32>) {
    let mut batch = Vec::with_capacity(events);
    for _ in 0..events {
        let mut e = runner.acquire("pointermove");
        for inst in 0..depth {
            e.accumulate_dispatch(Listener::clone(l), inst);
        }
        batch.push(e);
    }
    runner
        .enqueue(Accumulated::from(batch))
        .expect("batch is not empty");
}

fn bench_drain(c: &mut Criterion) {
    let noop: Listener<u32, u32> = listener(|e: &mut SyntheticEvent<u32, u32>, inst: &u32| {
        black_box((e.current_target(), inst));
        Ok(false)
    });
    let mut group = c.benchmark_group("drain");
    for &events in &[1_usize, 16, 256] {
        for (label, capacity) in [("pooled", 256_usize), ("unpooled", 0)] {
            let mut runner = Runner::with_config(
                IdentityHost,
                BatchConfig {
                    pool_capacity: capacity,
                    ..BatchConfig::default()
                },
            );
            group.bench_with_input(BenchmarkId::new(label, events), &events, |b, &n| {
                b.iter(|| {
                    fill(&mut runner, n, 8, &noop);
                    black_box(runner.run_pending().expect("no reentrancy"))
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_drain);
criterion_main!(benches);
