// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dispatch --heading-base-level=0

//! Understory Dispatch: deterministic, `no_std` batching and ordered dispatch of synthetic events.
//!
//! ## Overview
//!
//! This crate runs the listeners collected for UI events.
//! It does not hit test and it does not decide who listens.
//! Instead, feed it [`SyntheticEvent`](crate::event::SyntheticEvent)s whose
//! [`Dispatches`](crate::types::Dispatches) were filled by your toolkit (or by the
//! [`collect`](crate::collect) helpers), and it invokes them in order, batch by batch.
//!
//! ## Pieces
//!
//! - [`Accumulated`](crate::accumulate::Accumulated): zero, one, or many items; the shape of both
//!   the pending queue and an event's dispatches. A single item is never wrapped in a vector.
//! - [`execute`](crate::execute): three ways to run an event's dispatches — all in order,
//!   in order until one listener claims the event, or a single direct dispatch.
//! - [`BatchRunner`](crate::batch::BatchRunner): owns the pending queue and an
//!   [`EventPool`](crate::pool::EventPool), drains events in arrival order, and releases them
//!   unless they are persistent.
//!
//! ## Ordering
//!
//! Events are drained strictly in arrival order.
//! Listeners of one event run strictly in accumulation order, until one calls
//! [`stop_propagation`](crate::event::SyntheticEvent::stop_propagation).
//!
//! ## Errors
//!
//! A failing listener does not stop its batch.
//! Every listener error is recorded in [`BatchResult::errors`](crate::batch::BatchResult::errors),
//! and [`BatchResult::into_result`](crate::batch::BatchResult::into_result) surfaces the first.
//! Shape errors and reentrancy violations are reported as [`DispatchError`](crate::error::DispatchError).
//!
//! ## Reentrancy
//!
//! Listeners that raise new events post them to a [`Mailbox`](crate::batch::Mailbox).
//! The runner swaps the pending queue out before draining, so such events are never merged into the
//! batch in flight; [`ReentrancyPolicy`](crate::batch::ReentrancyPolicy) decides whether they wait
//! for the next batch or fail the current one.
//!
//! ## Workflow
//!
//! ```
//! use understory_dispatch::accumulate::Accumulated;
//! use understory_dispatch::batch::BatchRunner;
//! use understory_dispatch::collect::{accumulate_two_phase_dispatches, path_to_root};
//! use understory_dispatch::event::SyntheticEvent;
//! use understory_dispatch::types::{
//!     listener, EventKind, IdentityHost, Listener, ListenerLookup, ParentLookup, Phase,
//! };
//!
//! struct Parents;
//! impl ParentLookup<u32> for Parents {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node > 1).then(|| node - 1)
//!     }
//! }
//!
//! /// Only bubble listeners, and the target stops propagation.
//! struct Bubblers;
//! impl ListenerLookup<u32, u32> for Bubblers {
//!     fn listener_for(&self, inst: &u32, _: EventKind, phase: Phase) -> Option<Listener<u32, u32>> {
//!         (phase == Phase::Bubble && *inst == 3).then(|| {
//!             listener(|e: &mut SyntheticEvent<u32, u32>, _| {
//!                 e.stop_propagation();
//!                 Ok(false)
//!             })
//!         })
//!     }
//! }
//!
//! let mut runner: BatchRunner<u32, IdentityHost> = BatchRunner::new(IdentityHost);
//! let mut click = runner.acquire("click");
//! accumulate_two_phase_dispatches(&mut click, &path_to_root(3, &Parents), &Bubblers);
//!
//! let result = runner.run_events_in_batch(Accumulated::One(click)).unwrap();
//! assert_eq!(result.dispatched, 1);
//! assert!(result.into_result().is_ok());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod accumulate;
pub mod batch;
pub mod collect;
pub mod error;
pub mod event;
pub mod execute;
pub mod pool;
pub mod types;
