// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch executor: run an event's accumulated listeners.
//!
//! ## Modes
//!
//! - [`execute_dispatches_in_order`]: every listener in order; handler errors
//!   are captured into a caller-supplied list and never stop the walk.
//! - [`execute_dispatches_in_order_stop_at_true`]: in order until a listener
//!   returns `true`; that listener's instance is returned.
//! - [`execute_direct_dispatch`]: at most one listener; its return value is
//!   handed back.
//!
//! All three honor [`SyntheticEvent::is_propagation_stopped`] before each
//! listener of a sequence, and all three leave the event with no dispatches,
//! whatever the outcome.
//!
//! ## Example
//!
//! ```
//! use understory_dispatch::event::SyntheticEvent;
//! use understory_dispatch::execute::execute_dispatches_in_order;
//! use understory_dispatch::types::{listener, IdentityHost};
//!
//! let mut event: SyntheticEvent<u32, u32> = SyntheticEvent::new("click");
//! event.accumulate_dispatch(listener(|e: &mut SyntheticEvent<u32, u32>, _| {
//!     assert_eq!(e.current_target(), Some(&7));
//!     Ok(false)
//! }), 7);
//!
//! let mut errors = Vec::new();
//! execute_dispatches_in_order(&mut event, &IdentityHost, &mut errors);
//! assert!(errors.is_empty());
//! assert!(!event.has_dispatches());
//! ```

use alloc::vec::Vec;

use crate::accumulate::Accumulated;
use crate::error::{DispatchError, HandlerError, Result};
use crate::event::SyntheticEvent;
use crate::types::{Dispatch, HostLookup};

/// Deliver `event` to one dispatch.
///
/// Sets [`current_target`](SyntheticEvent::current_target) to the host node of
/// the dispatch's instance for the duration of the call, then clears it.
pub fn execute_dispatch<I, N, P, H>(
    event: &mut SyntheticEvent<I, N, P>,
    dispatch: &Dispatch<I, N, P>,
    host: &H,
) -> core::result::Result<bool, HandlerError>
where
    H: HostLookup<I, Node = N>,
{
    tracing::trace!(kind = event.kind(), "invoking listener");
    event.current_target = host.node_of(&dispatch.instance);
    let result = (dispatch.listener)(event, &dispatch.instance);
    event.current_target = None;
    result
}

/// Run every accumulated listener in order.
///
/// Propagation stops before the next listener of a sequence once a listener
/// calls [`SyntheticEvent::stop_propagation`]. A listener error does not stop
/// the walk; it is appended to `errors` so the caller can surface it after
/// the batch completes.
pub fn execute_dispatches_in_order<I, N, P, H>(
    event: &mut SyntheticEvent<I, N, P>,
    host: &H,
    errors: &mut Vec<HandlerError>,
) where
    H: HostLookup<I, Node = N>,
{
    let dispatches = event.dispatches.take();
    match &dispatches {
        Accumulated::Empty => {}
        Accumulated::One(dispatch) => {
            let result = execute_dispatch(event, dispatch, host);
            capture(event, result, errors);
        }
        Accumulated::Many(list) => {
            for dispatch in list {
                if event.is_propagation_stopped() {
                    break;
                }
                let result = execute_dispatch(event, dispatch, host);
                capture(event, result, errors);
            }
        }
    }
}

fn capture<I, N, P>(
    event: &SyntheticEvent<I, N, P>,
    result: core::result::Result<bool, HandlerError>,
    errors: &mut Vec<HandlerError>,
) {
    if let Err(err) = result {
        tracing::warn!(
            kind = event.kind(),
            error = %err,
            "listener failed; deferring error until the batch completes"
        );
        errors.push(err);
    }
}

/// Run listeners in order until one returns `true`.
///
/// Returns the instance paired with that listener, or `None` if no listener
/// claimed the event. Listeners are called without a
/// [`current_target`](SyntheticEvent::current_target). A listener error ends
/// the walk and is returned as [`DispatchError::Handler`].
pub fn execute_dispatches_in_order_stop_at_true<I, N, P>(
    event: &mut SyntheticEvent<I, N, P>,
) -> Result<Option<I>> {
    let dispatches = event.dispatches.take();
    match dispatches {
        Accumulated::Empty => Ok(None),
        Accumulated::One(dispatch) => {
            if (dispatch.listener)(event, &dispatch.instance)? {
                return Ok(Some(dispatch.instance));
            }
            Ok(None)
        }
        Accumulated::Many(list) => {
            for dispatch in list {
                if event.is_propagation_stopped() {
                    break;
                }
                if (dispatch.listener)(event, &dispatch.instance)? {
                    return Ok(Some(dispatch.instance));
                }
            }
            Ok(None)
        }
    }
}

/// Execute a "direct" dispatch: at most one listener may be accumulated.
///
/// Returns the listener's result, or `None` when nothing was accumulated.
/// More than one dispatch fails with [`DispatchError::InvalidArgument`]
/// before any listener runs; the dispatches are discarded either way.
/// Only the count matters, so a sequence holding zero or one dispatch is
/// treated like [`Accumulated::Empty`] or [`Accumulated::One`].
pub fn execute_direct_dispatch<I, N, P, H>(
    event: &mut SyntheticEvent<I, N, P>,
    host: &H,
) -> Result<Option<bool>>
where
    H: HostLookup<I, Node = N>,
{
    let dispatches = event.dispatches.take();
    if dispatches.len() > 1 {
        return Err(DispatchError::InvalidArgument(
            "direct dispatch requires at most one accumulated listener",
        ));
    }
    match dispatches.into_iter().next() {
        None => {
            event.current_target = None;
            Ok(None)
        }
        Some(dispatch) => Ok(Some(execute_dispatch(event, &dispatch, host)?)),
    }
}

/// Returns `true` if any dispatch is accumulated on `event`.
pub fn has_dispatches<I, N, P>(event: &SyntheticEvent<I, N, P>) -> bool {
    event.has_dispatches()
}
