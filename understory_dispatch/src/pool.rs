// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event pool: per-kind free lists of reset [`SyntheticEvent`]s.
//!
//! ## Semantics
//!
//! - [`EventPool::acquire`] pops a recycled event of the requested kind, or
//!   builds a fresh one when the free list is empty.
//! - [`EventPool::release`] resets the event and keeps it while the free list
//!   for its kind holds fewer than `capacity` events; surplus events are dropped.
//! - Ownership is explicit: a released event is moved into the pool, so it
//!   cannot be observed again until it is acquired.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::event::SyntheticEvent;
use crate::types::EventKind;

/// Default number of events kept per kind.
pub const DEFAULT_POOL_CAPACITY: usize = 10;

/// Free lists of reusable events, keyed by [`EventKind`].
pub struct EventPool<I, N, P = ()> {
    free: BTreeMap<EventKind, Vec<SyntheticEvent<I, N, P>>>,
    capacity: usize,
}

impl<I, N, P> core::fmt::Debug for EventPool<I, N, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventPool")
            .field("kinds", &self.free.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<I, N, P> Default for EventPool<I, N, P> {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl<I, N, P> EventPool<I, N, P> {
    /// Create a pool that keeps up to `capacity` events per kind.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: BTreeMap::new(),
            capacity,
        }
    }

    /// Maximum number of events kept per kind.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Take an event of `kind`, recycled if one is available.
    pub fn acquire(&mut self, kind: EventKind) -> SyntheticEvent<I, N, P> {
        match self.free.get_mut(kind).and_then(Vec::pop) {
            Some(mut event) => {
                event.reset(kind);
                event
            }
            None => SyntheticEvent::new(kind),
        }
    }

    /// Reset `event` and return it to the free list for its kind.
    ///
    /// Returns `true` if the event was kept, `false` if the free list was full.
    pub fn release(&mut self, mut event: SyntheticEvent<I, N, P>) -> bool {
        let kind = event.kind();
        event.reset(kind);
        let list = self.free.entry(kind).or_default();
        if list.len() < self.capacity {
            list.push(event);
            true
        } else {
            false
        }
    }

    /// Number of recycled events ready for `kind`.
    pub fn available(&self, kind: EventKind) -> usize {
        self.free.get(kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::listener;

    type Pool = EventPool<u32, u32, u8>;

    #[test]
    fn released_event_is_reset_and_reused() {
        let mut pool = Pool::default();
        let mut e = pool.acquire("click");
        e.set_payload(Some(3));
        e.accumulate_dispatch(listener(|_, _| Ok(false)), 1);
        e.stop_propagation();
        assert!(pool.release(e));
        assert_eq!(pool.available("click"), 1);
        assert_eq!(pool.available("keydown"), 0);

        let again = pool.acquire("click");
        assert_eq!(pool.available("click"), 0);
        assert!(again.payload().is_none());
        assert!(!again.has_dispatches());
        assert!(!again.is_propagation_stopped());
    }

    #[test]
    fn free_lists_are_per_kind() {
        let mut pool = Pool::default();
        pool.release(SyntheticEvent::new("click"));
        let e = pool.acquire("keydown");
        assert_eq!(e.kind(), "keydown");
        assert_eq!(pool.available("click"), 1, "other kinds stay untouched");
    }

    #[test]
    fn capacity_bounds_each_free_list() {
        let mut pool = Pool::new(2);
        assert!(pool.release(SyntheticEvent::new("click")));
        assert!(pool.release(SyntheticEvent::new("click")));
        assert!(!pool.release(SyntheticEvent::new("click")));
        assert_eq!(pool.available("click"), 2);
        assert!(pool.release(SyntheticEvent::new("scroll")));
    }
}
