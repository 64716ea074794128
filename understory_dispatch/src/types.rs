// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for dispatch: phases, flags, listeners, lookups, and dispatch pairs.
//!
//! ## Overview
//!
//! These types describe how a [`SyntheticEvent`] reaches application code.
//! A [`Dispatch`] pairs one [`Listener`] with the component instance that
//! registered it, and [`Dispatches`] holds zero, one, or many such pairs in
//! propagation order. Because each pair carries both halves, a listener can
//! never be separated from its instance.

use alloc::rc::Rc;

use crate::accumulate::Accumulated;
use crate::error::HandlerError;
use crate::event::SyntheticEvent;

/// Name of an event kind, such as `"click"` or `"touchstart"`.
///
/// Pools keep one free list per kind.
pub type EventKind = &'static str;

/// Phases of event propagation used when collecting dispatches.
///
/// See [`collect`](crate::collect) for the order in which phases are visited.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Root-to-target traversal.
    Capture,
    /// Target only, used for direct dispatch.
    Target,
    /// Target-to-root traversal.
    Bubble,
}

bitflags::bitflags! {
    /// Per-event state bits that listeners and the runner read.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// A listener asked that no further listeners run for this event.
        const PROPAGATION_STOPPED = 0b0000_0001;
        /// A listener asked that the host skip its default action.
        const DEFAULT_PREVENTED   = 0b0000_0010;
        /// The event is handed back to the caller instead of its pool.
        const PERSISTENT          = 0b0000_0100;
    }
}

/// Application-level callback registered by a component instance.
///
/// Listeners receive the event and the instance they were registered on.
/// The returned `bool` is only consulted by
/// [`execute_dispatches_in_order_stop_at_true`](crate::execute::execute_dispatches_in_order_stop_at_true)
/// and [`execute_direct_dispatch`](crate::execute::execute_direct_dispatch).
pub type Listener<I, N, P = ()> =
    Rc<dyn Fn(&mut SyntheticEvent<I, N, P>, &I) -> Result<bool, HandlerError>>;

/// Wrap a closure as a [`Listener`].
///
/// Spelling the bound out here lets closure parameter types be inferred.
pub fn listener<I, N, P, F>(f: F) -> Listener<I, N, P>
where
    F: Fn(&mut SyntheticEvent<I, N, P>, &I) -> Result<bool, HandlerError> + 'static,
{
    Rc::new(f)
}

/// One listener paired with the instance that registered it.
pub struct Dispatch<I, N, P = ()> {
    /// The callback to invoke.
    pub listener: Listener<I, N, P>,
    /// The originating component instance.
    pub instance: I,
}

impl<I, N, P> Dispatch<I, N, P> {
    /// Pair a listener with its instance.
    pub fn new(listener: Listener<I, N, P>, instance: I) -> Self {
        Self { listener, instance }
    }
}

impl<I: Clone, N, P> Clone for Dispatch<I, N, P> {
    fn clone(&self) -> Self {
        Self {
            listener: Rc::clone(&self.listener),
            instance: self.instance.clone(),
        }
    }
}

impl<I: core::fmt::Debug, N, P> core::fmt::Debug for Dispatch<I, N, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatch")
            .field("instance", &self.instance)
            .finish_non_exhaustive()
    }
}

/// Dispatches accumulated on one event, in propagation order.
pub type Dispatches<I, N, P = ()> = Accumulated<Dispatch<I, N, P>>;

/// Resolve a component instance to its current host node.
///
/// The executor consults this to fill
/// [`SyntheticEvent::current_target`](crate::event::SyntheticEvent::current_target)
/// around each listener call. Resolution itself belongs to the surrounding
/// toolkit.
pub trait HostLookup<I> {
    /// Host node type (a DOM node, a native view handle, ...).
    type Node;
    /// Returns the host node for `instance`, or `None` if it has none.
    fn node_of(&self, instance: &I) -> Option<Self::Node>;
}

/// A host lookup for toolkits whose instances are their own host nodes.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityHost;

impl<I: Clone> HostLookup<I> for IdentityHost {
    type Node = I;

    #[inline]
    fn node_of(&self, instance: &I) -> Option<I> {
        Some(instance.clone())
    }
}

/// Look up the parent of an instance to reconstruct a root→target path.
///
/// Used by [`path_to_root`](crate::collect::path_to_root).
pub trait ParentLookup<I> {
    /// Returns the parent of `instance`, or `None` if it is a root.
    fn parent_of(&self, instance: &I) -> Option<I>;
}

/// A no-op parent provider: every instance is a root.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<I> ParentLookup<I> for NoParent {
    #[inline]
    fn parent_of(&self, _instance: &I) -> Option<I> {
        None
    }
}

/// Find the listener an instance registered for an event kind and phase.
///
/// This stands in for the toolkit's registration tables, which live outside
/// this crate.
pub trait ListenerLookup<I, N, P = ()> {
    /// Returns the listener `instance` registered for `kind` in `phase`, if any.
    fn listener_for(&self, instance: &I, kind: EventKind, phase: Phase)
    -> Option<Listener<I, N, P>>;
}
