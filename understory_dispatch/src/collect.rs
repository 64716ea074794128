// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collect dispatches along a propagation path.
//!
//! ## Overview
//!
//! These helpers fill an event's [`Dispatches`](crate::types::Dispatches)
//! before it is handed to the [batch runner](crate::batch). Which listener an
//! instance registered is answered by a [`ListenerLookup`]; this module only
//! decides the order.
//!
//! ## Ordering
//!
//! For a root→target path `[a, b, c]`, two-phase collection yields
//! capture listeners `a, b, c` followed by bubble listeners `c, b, a`.
//! Instances without a listener for a phase are skipped.
//!
//! ```
//! use understory_dispatch::collect::accumulate_two_phase_dispatches;
//! use understory_dispatch::event::SyntheticEvent;
//! use understory_dispatch::types::{listener, EventKind, Listener, ListenerLookup, Phase};
//!
//! struct Everyone;
//! impl ListenerLookup<u32, u32> for Everyone {
//!     fn listener_for(&self, _: &u32, _: EventKind, _: Phase) -> Option<Listener<u32, u32>> {
//!         Some(listener(|_, _| Ok(false)))
//!     }
//! }
//!
//! let mut event: SyntheticEvent<u32, u32> = SyntheticEvent::new("click");
//! accumulate_two_phase_dispatches(&mut event, &[1, 2], &Everyone);
//! let order: Vec<u32> = event.dispatches().iter().map(|d| d.instance).collect();
//! assert_eq!(order, vec![1, 2, 2, 1]);
//! ```

use alloc::vec::Vec;

use crate::event::SyntheticEvent;
use crate::types::{ListenerLookup, ParentLookup, Phase};

/// Reconstruct the root→target path of `target` by walking parents.
///
/// The caller ensures the ancestry is acyclic.
pub fn path_to_root<I: Clone>(target: I, parents: &impl ParentLookup<I>) -> Vec<I> {
    let mut out = Vec::new();
    let mut cur = target;
    loop {
        let parent = parents.parent_of(&cur);
        out.push(cur);
        match parent {
            Some(p) => cur = p,
            None => break,
        }
    }
    out.reverse();
    out
}

/// Accumulate capture then bubble listeners for a root→target `path`.
///
/// Returns the number of dispatches added.
pub fn accumulate_two_phase_dispatches<I, N, P, L>(
    event: &mut SyntheticEvent<I, N, P>,
    path: &[I],
    lookup: &L,
) -> usize
where
    I: Clone,
    L: ListenerLookup<I, N, P>,
{
    let kind = event.kind();
    let mut added = 0;
    // Capture: root→target
    for inst in path {
        if let Some(l) = lookup.listener_for(inst, kind, Phase::Capture) {
            event.accumulate_dispatch(l, inst.clone());
            added += 1;
        }
    }
    // Bubble: target→root
    for inst in path.iter().rev() {
        if let Some(l) = lookup.listener_for(inst, kind, Phase::Bubble) {
            event.accumulate_dispatch(l, inst.clone());
            added += 1;
        }
    }
    tracing::trace!(kind, path = path.len(), added, "collected two-phase dispatches");
    added
}

/// Accumulate the target-phase listener of `instance`, if it registered one.
///
/// Events collected this way are suitable for
/// [`execute_direct_dispatch`](crate::execute::execute_direct_dispatch) as long
/// as nothing else was accumulated on them.
pub fn accumulate_direct_dispatches<I, N, P, L>(
    event: &mut SyntheticEvent<I, N, P>,
    instance: &I,
    lookup: &L,
) -> bool
where
    I: Clone,
    L: ListenerLookup<I, N, P>,
{
    match lookup.listener_for(instance, event.kind(), Phase::Target) {
        Some(l) => {
            event.accumulate_dispatch(l, instance.clone());
            true
        }
        None => false,
    }
}
