// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reentrant events and deferred errors.
//!
//! A listener raises a follow-up event while its batch is draining, and
//! another listener fails. The follow-up waits for the next batch, and the
//! failure is reported once the first batch is complete.
//!
//! Run:
//! - `RUST_LOG=understory_dispatch=debug cargo run -p understory_demos --example dispatch_reentrancy`

use tracing_subscriber::EnvFilter;
use understory_dispatch::accumulate::Accumulated;
use understory_dispatch::batch::{BatchEvent, BatchRunner, ReentrancyPolicy};
use understory_dispatch::error::HandlerError;
use understory_dispatch::event::SyntheticEvent;
use understory_dispatch::types::{IdentityHost, listener};

type Event = BatchEvent<u32, IdentityHost>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut runner: BatchRunner<u32, IdentityHost> = BatchRunner::new(IdentityHost);
    let mailbox = runner.mailbox();

    let mut press = runner.acquire("press");
    press.accumulate_dispatch(
        listener(move |_: &mut Event, inst: &u32| {
            println!("  press handled by {inst}; raising a follow-up");
            let mut focus: Event = SyntheticEvent::new("focus");
            focus.accumulate_dispatch(
                listener(|_: &mut Event, inst: &u32| {
                    println!("  focus handled by {inst}");
                    Ok(false)
                }),
                *inst,
            );
            mailbox.post(focus);
            Ok(false)
        }),
        1,
    );

    let mut release = runner.acquire("release");
    release.accumulate_dispatch(
        listener(|_: &mut Event, _: &u32| Err(HandlerError::new("release handler failed"))),
        2,
    );
    release.accumulate_dispatch(
        listener(|_: &mut Event, inst: &u32| {
            println!("  release still reached {inst}");
            Ok(false)
        }),
        3,
    );

    println!("== Batch 1 ==");
    let first = runner
        .run_events_in_batch(Accumulated::Many(vec![press, release]))
        .expect("deferred by default");
    println!(
        "  dispatched={} deferred={}",
        first.dispatched, first.deferred
    );
    if let Err(err) = first.into_result() {
        println!("  first error: {err}");
    }

    println!("== Batch 2 ==");
    let second = runner.run_pending().expect("nothing new was enqueued");
    println!("  dispatched={}", second.dispatched);

    println!("== Rejecting reentrancy ==");
    runner.set_reentrancy(ReentrancyPolicy::Reject);
    let mailbox = runner.mailbox();
    let mut nested = runner.acquire("press");
    nested.accumulate_dispatch(
        listener(move |_: &mut Event, _: &u32| {
            mailbox.post(SyntheticEvent::new("focus"));
            Ok(false)
        }),
        1,
    );
    match runner.run_events_in_batch(Accumulated::One(nested)) {
        Ok(_) => println!("  unexpected success"),
        Err(err) => println!("  {err}; pending={}", runner.pending_len()),
    }
    if let Some(rejected) = runner.take_rejected() {
        println!(
            "  rejected batch: dispatched={} errors={}",
            rejected.dispatched,
            rejected.errors.len()
        );
    }
}
