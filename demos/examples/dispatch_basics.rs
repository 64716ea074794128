// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch basics.
//!
//! This minimal example collects capture and bubble listeners along a
//! root→target path, drains two events in one batch, and shows which event
//! went back to the pool and which one was retained.
//!
//! Run:
//! - `RUST_LOG=understory_dispatch=trace cargo run -p understory_demos --example dispatch_basics`

use std::cell::RefCell;
use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use understory_dispatch::accumulate::Accumulated;
use understory_dispatch::batch::BatchRunner;
use understory_dispatch::collect::{accumulate_two_phase_dispatches, path_to_root};
use understory_dispatch::event::SyntheticEvent;
use understory_dispatch::types::{
    EventKind, HostLookup, Listener, ListenerLookup, ParentLookup, Phase, listener,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Component(u32);

/// Host node ids are component ids offset by 100.
struct Host;
impl HostLookup<Component> for Host {
    type Node = u32;
    fn node_of(&self, instance: &Component) -> Option<u32> {
        Some(instance.0 + 100)
    }
}

struct Parents;
impl ParentLookup<Component> for Parents {
    fn parent_of(&self, node: &Component) -> Option<Component> {
        match node.0 {
            3 => Some(Component(2)),
            2 => Some(Component(1)),
            _ => None,
        }
    }
}

type Event = SyntheticEvent<Component, u32, (f64, f64)>;

struct Registry {
    trace: Rc<RefCell<Vec<String>>>,
}

impl ListenerLookup<Component, u32, (f64, f64)> for Registry {
    fn listener_for(
        &self,
        instance: &Component,
        kind: EventKind,
        phase: Phase,
    ) -> Option<Listener<Component, u32, (f64, f64)>> {
        // The middle component only listens while bubbling.
        if instance.0 == 2 && phase == Phase::Capture {
            return None;
        }
        let trace = Rc::clone(&self.trace);
        Some(listener(move |e: &mut Event, inst: &Component| {
            trace.borrow_mut().push(format!(
                "{kind:<6} {phase:?} {inst:?} current_target={:?} payload={:?}",
                e.current_target(),
                e.payload()
            ));
            Ok(false)
        }))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let trace = Rc::new(RefCell::new(Vec::new()));
    let registry = Registry {
        trace: Rc::clone(&trace),
    };
    let mut runner: BatchRunner<Component, Host, (f64, f64)> = BatchRunner::new(Host);
    let path = path_to_root(Component(3), &Parents);

    let mut down = runner.acquire("down");
    down.set_payload(Some((4.0, 2.0)));
    accumulate_two_phase_dispatches(&mut down, &path, &registry);

    let mut up = runner.acquire("up");
    up.set_payload(Some((4.0, 3.0)));
    accumulate_two_phase_dispatches(&mut up, &path, &registry);
    up.persist();

    let result = runner
        .run_events_in_batch(Accumulated::Many(vec![down, up]))
        .expect("no reentrant events in this demo");

    println!("== Listener calls (capture root→target, then bubble target→root) ==");
    for line in trace.borrow().iter() {
        println!("  {line}");
    }
    println!("== Batch ==");
    println!(
        "  dispatched={} released={} retained={} errors={}",
        result.dispatched,
        result.released,
        result.retained.len(),
        result.errors.len()
    );
    println!(
        "  pooled: down={} up={}",
        runner.pool().available("down"),
        runner.pool().available("up")
    );
    for kept in &result.retained {
        println!("  retained {} payload={:?}", kept.kind(), kept.payload());
    }
}
