// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The synthetic event record.
//!
//! ## Lifecycle
//!
//! 1) Acquired from an [`EventPool`](crate::pool::EventPool) (or built with
//!    [`SyntheticEvent::new`]) when the host observes an interaction.
//! 2) Populated with [`Dispatches`] by the collection layer, for example via
//!    [`accumulate_two_phase_dispatches`](crate::collect::accumulate_two_phase_dispatches).
//! 3) Handed to the [`BatchRunner`](crate::batch::BatchRunner), which drains
//!    the dispatches through the [executor](crate::execute).
//! 4) Released to its pool, or returned to the caller when
//!    [persistent](SyntheticEvent::persist).

use crate::accumulate::Accumulated;
use crate::types::{Dispatch, Dispatches, EventFlags, EventKind, Listener};

/// A reusable record describing one observed interaction.
///
/// - `I`: component instance type.
/// - `N`: host node type, as produced by a [`HostLookup`](crate::types::HostLookup).
/// - `P`: native payload carried alongside (pointer position, key code, ...).
pub struct SyntheticEvent<I, N, P = ()> {
    pub(crate) kind: EventKind,
    pub(crate) current_target: Option<N>,
    pub(crate) dispatches: Dispatches<I, N, P>,
    pub(crate) flags: EventFlags,
    pub(crate) payload: Option<P>,
}

impl<I, N, P> SyntheticEvent<I, N, P> {
    /// Create a fresh, unpooled event of the given kind.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            current_target: None,
            dispatches: Accumulated::Empty,
            flags: EventFlags::empty(),
            payload: None,
        }
    }

    /// Builder form: attach a native payload.
    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The event kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Host node of the instance whose listener is currently running.
    ///
    /// `None` outside of a listener call.
    pub fn current_target(&self) -> Option<&N> {
        self.current_target.as_ref()
    }

    /// Native payload, if any.
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Mutable access to the native payload.
    pub fn payload_mut(&mut self) -> Option<&mut P> {
        self.payload.as_mut()
    }

    /// Replace the native payload.
    pub fn set_payload(&mut self, payload: Option<P>) {
        self.payload = payload;
    }

    /// Current state bits.
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Dispatches accumulated so far.
    pub fn dispatches(&self) -> &Dispatches<I, N, P> {
        &self.dispatches
    }

    /// Replace all accumulated dispatches.
    pub fn set_dispatches(&mut self, dispatches: Dispatches<I, N, P>) {
        self.dispatches = dispatches;
    }

    /// Append one listener/instance pair after those already accumulated.
    pub fn accumulate_dispatch(&mut self, listener: Listener<I, N, P>, instance: I) {
        self.dispatches.push(Dispatch::new(listener, instance));
    }

    /// Returns `true` if any dispatch is accumulated.
    pub fn has_dispatches(&self) -> bool {
        !self.dispatches.is_empty()
    }

    /// Stop delivery to the remaining listeners of this event.
    pub fn stop_propagation(&mut self) {
        self.flags.insert(EventFlags::PROPAGATION_STOPPED);
    }

    /// Whether a listener stopped propagation.
    pub fn is_propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }

    /// Ask the host to skip its default action.
    pub fn prevent_default(&mut self) {
        self.flags.insert(EventFlags::DEFAULT_PREVENTED);
    }

    /// Whether a listener prevented the default action.
    pub fn is_default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }

    /// Keep this event out of its pool after dispatch.
    ///
    /// The batch runner hands persistent events back in
    /// [`BatchResult::retained`](crate::batch::BatchResult::retained).
    pub fn persist(&mut self) {
        self.flags.insert(EventFlags::PERSISTENT);
    }

    /// Whether this event is persistent.
    pub fn is_persistent(&self) -> bool {
        self.flags.contains(EventFlags::PERSISTENT)
    }

    /// Reset all state for reuse as an event of `kind`.
    pub(crate) fn reset(&mut self, kind: EventKind) {
        self.kind = kind;
        self.current_target = None;
        self.dispatches = Accumulated::Empty;
        self.flags = EventFlags::empty();
        self.payload = None;
    }
}

impl<I, N, P> core::fmt::Debug for SyntheticEvent<I, N, P>
where
    I: core::fmt::Debug,
    N: core::fmt::Debug,
    P: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SyntheticEvent")
            .field("kind", &self.kind)
            .field("current_target", &self.current_target)
            .field("dispatches", &self.dispatches)
            .field("flags", &self.flags)
            .field("payload", &self.payload)
            .finish()
    }
}
