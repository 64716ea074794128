// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch runner: drain pending events in arrival order and release them.
//!
//! ## Overview
//!
//! The runner owns the pending queue and the [`EventPool`]. Each call to
//! [`BatchRunner::run_events_in_batch`]:
//!
//! 1) Accumulates its argument into the pending queue.
//! 2) Swaps the pending queue for an empty one, keeping the old contents as
//!    the batch being drained.
//! 3) Runs [`execute_dispatches_in_order`] on each event, then releases it to
//!    the pool or, if [persistent](SyntheticEvent::persist), hands it back in
//!    [`BatchResult::retained`].
//! 4) Checks the pending queue again and applies the [`ReentrancyPolicy`].
//!
//! ## Reentrancy
//!
//! Listeners cannot borrow the runner while it drains. They enqueue through a
//! [`Mailbox`], which writes to the pending queue. Because the queue was
//! swapped out before draining, such events never join the batch in flight:
//! with [`ReentrancyPolicy::Defer`] they wait for the next batch, and with
//! [`ReentrancyPolicy::Reject`] the runner reports
//! [`DispatchError::InternalInvariantViolation`].
//!
//! A rejected batch has still run to completion. Its outcome (listener errors
//! and persistent events included) is kept on the runner until
//! [`BatchRunner::take_rejected`] collects it, or else folded into the result
//! of the next successful call.
//!
//! ## Errors
//!
//! Listener errors never abort a batch. They are collected in order in
//! [`BatchResult::errors`]; [`BatchResult::into_result`] surfaces the first.
//!
//! ## Example
//!
//! ```
//! use understory_dispatch::accumulate::Accumulated;
//! use understory_dispatch::batch::BatchRunner;
//! use understory_dispatch::types::{listener, IdentityHost};
//!
//! let mut runner: BatchRunner<u32, IdentityHost> = BatchRunner::new(IdentityHost);
//! let mut event = runner.acquire("click");
//! event.accumulate_dispatch(listener(|_, _| Ok(false)), 1);
//!
//! let result = runner.run_events_in_batch(Accumulated::One(event)).unwrap();
//! assert_eq!(result.dispatched, 1);
//! assert!(result.is_clean());
//! assert_eq!(runner.pool().available("click"), 1);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::accumulate::Accumulated;
use crate::error::{DispatchError, HandlerError, Result};
use crate::event::SyntheticEvent;
use crate::execute::execute_dispatches_in_order;
use crate::pool::{DEFAULT_POOL_CAPACITY, EventPool};
use crate::types::{EventKind, HostLookup};

/// The event type a runner over host lookup `H` drains.
pub type BatchEvent<I, H, P = ()> = SyntheticEvent<I, <H as HostLookup<I>>::Node, P>;

type Queue<I, N, P> = Rc<RefCell<Accumulated<SyntheticEvent<I, N, P>>>>;

/// What to do with events enqueued while a batch is draining.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ReentrancyPolicy {
    /// Leave them queued for the next batch.
    #[default]
    Defer,
    /// Fail the batch with [`DispatchError::InternalInvariantViolation`].
    Reject,
}

/// Runner configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BatchConfig {
    /// Policy for events enqueued during a drain.
    pub reentrancy: ReentrancyPolicy,
    /// Events kept per kind by the runner's pool.
    pub pool_capacity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            reentrancy: ReentrancyPolicy::Defer,
            pool_capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

/// Outcome of draining one or more batches.
#[derive(Debug)]
pub struct BatchResult<I, N, P = ()> {
    /// Events drained.
    pub dispatched: usize,
    /// Events released to the pool.
    pub released: usize,
    /// Events enqueued during the drain and left for a later batch.
    pub deferred: usize,
    /// Listener errors, in the order they occurred.
    pub errors: Vec<HandlerError>,
    /// Persistent events, handed back to the caller.
    pub retained: Vec<SyntheticEvent<I, N, P>>,
}

impl<I, N, P> Default for BatchResult<I, N, P> {
    fn default() -> Self {
        Self {
            dispatched: 0,
            released: 0,
            deferred: 0,
            errors: Vec::new(),
            retained: Vec::new(),
        }
    }
}

impl<I, N, P> BatchResult<I, N, P> {
    /// Returns `true` if no listener failed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first listener error of the batch, if any.
    pub fn first_error(&self) -> Option<&HandlerError> {
        self.errors.first()
    }

    /// Surface the first listener error, or return `self` unchanged.
    ///
    /// Later errors of the same batch are dropped.
    pub fn into_result(mut self) -> core::result::Result<Self, HandlerError> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(self.errors.swap_remove(0))
        }
    }

    /// Fold a later batch's outcome into this one.
    pub fn absorb(&mut self, later: Self) {
        self.dispatched += later.dispatched;
        self.released += later.released;
        self.deferred = later.deferred;
        self.errors.extend(later.errors);
        self.retained.extend(later.retained);
    }
}

/// Handle for enqueuing events from inside listeners.
///
/// Obtained from [`BatchRunner::mailbox`]. Posting never runs anything; the
/// events wait for the runner's next batch.
pub struct Mailbox<I, N, P = ()> {
    queue: Queue<I, N, P>,
}

impl<I, N, P> Clone for Mailbox<I, N, P> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<I, N, P> core::fmt::Debug for Mailbox<I, N, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mailbox")
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}

impl<I, N, P> Mailbox<I, N, P> {
    /// Enqueue one event.
    pub fn post(&self, event: SyntheticEvent<I, N, P>) {
        self.queue.borrow_mut().push(event);
    }

    /// Enqueue one or more events; empty input is an invalid argument.
    pub fn post_all(&self, events: Accumulated<SyntheticEvent<I, N, P>>) -> Result<()> {
        self.queue.borrow_mut().accumulate_into(events)
    }

    /// Number of events waiting for the next batch.
    pub fn pending_len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Owns the pending queue and drains it in batches.
///
/// ## Usage
///
/// - Construct with [`BatchRunner::new`] for default policies, or
///   [`BatchRunner::with_config`].
/// - Take events from [`BatchRunner::acquire`], fill their dispatches, and pass
///   them to [`BatchRunner::run_events_in_batch`].
/// - Hand [`BatchRunner::mailbox`] to listeners that raise follow-up events.
pub struct BatchRunner<I, H: HostLookup<I>, P = ()> {
    host: H,
    queue: Queue<I, H::Node, P>,
    pool: EventPool<I, H::Node, P>,
    config: BatchConfig,
    rejected: Option<BatchResult<I, H::Node, P>>,
}

impl<I, H: HostLookup<I>, P> core::fmt::Debug for BatchRunner<I, H, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("pending", &self.pending_len())
            .field("config", &self.config)
            .field("rejected", &self.rejected.is_some())
            .finish_non_exhaustive()
    }
}

impl<I, H: HostLookup<I>, P> BatchRunner<I, H, P> {
    /// Create a runner with the default [`BatchConfig`].
    pub fn new(host: H) -> Self {
        Self::with_config(host, BatchConfig::default())
    }

    /// Create a runner with an explicit configuration.
    pub fn with_config(host: H, config: BatchConfig) -> Self {
        Self {
            host,
            queue: Rc::new(RefCell::new(Accumulated::Empty)),
            pool: EventPool::new(config.pool_capacity),
            config,
            rejected: None,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Change the policy for events enqueued during a drain.
    pub fn set_reentrancy(&mut self, policy: ReentrancyPolicy) {
        self.config.reentrancy = policy;
    }

    /// The host lookup used to resolve current targets.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The runner's event pool.
    pub fn pool(&self) -> &EventPool<I, H::Node, P> {
        &self.pool
    }

    /// Mutable access to the runner's event pool.
    pub fn pool_mut(&mut self) -> &mut EventPool<I, H::Node, P> {
        &mut self.pool
    }

    /// Take an event of `kind` from the pool.
    pub fn acquire(&mut self, kind: EventKind) -> BatchEvent<I, H, P> {
        self.pool.acquire(kind)
    }

    /// Return an event the caller no longer needs, such as a retained one.
    pub fn release(&mut self, event: BatchEvent<I, H, P>) -> bool {
        self.pool.release(event)
    }

    /// A handle that enqueues into this runner's pending queue.
    pub fn mailbox(&self) -> Mailbox<I, H::Node, P> {
        Mailbox {
            queue: Rc::clone(&self.queue),
        }
    }

    /// Number of events waiting for the next batch.
    pub fn pending_len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Enqueue events without draining.
    pub fn enqueue(&mut self, events: Accumulated<BatchEvent<I, H, P>>) -> Result<()> {
        self.queue.borrow_mut().accumulate_into(events)
    }

    /// Take the outcome of batches that ended in a reentrancy violation.
    ///
    /// Returns `None` if nothing was rejected since the last successful call.
    pub fn take_rejected(&mut self) -> Option<BatchResult<I, H::Node, P>> {
        self.rejected.take()
    }

    /// Drain whatever is pending.
    pub fn run_pending(&mut self) -> Result<BatchResult<I, H::Node, P>> {
        self.run_events_in_batch(Accumulated::Empty)
    }

    /// Enqueue `events` (if any) and drain the pending queue as one batch.
    ///
    /// Listener errors are reported in the returned [`BatchResult`]. An `Err`
    /// is only returned when the queue is non-empty after the drain under
    /// [`ReentrancyPolicy::Reject`]; the drained batch's outcome is then kept
    /// for [`BatchRunner::take_rejected`] and, if not taken, merged into the
    /// next returned result.
    pub fn run_events_in_batch(
        &mut self,
        events: Accumulated<BatchEvent<I, H, P>>,
    ) -> Result<BatchResult<I, H::Node, P>> {
        if !events.is_empty() {
            self.queue.borrow_mut().accumulate_into(events)?;
        }

        // Swap before draining so that events enqueued by listeners are not
        // mistaken for part of this batch.
        let processing = self.queue.borrow_mut().take();
        let mut result = self.rejected.take().unwrap_or_default();
        result.deferred = 0;
        if processing.is_empty() {
            return Ok(result);
        }

        tracing::debug!(events = processing.len(), "draining event batch");
        for mut event in processing {
            execute_dispatches_in_order(&mut event, &self.host, &mut result.errors);
            result.dispatched += 1;
            if event.is_persistent() {
                result.retained.push(event);
            } else {
                let kind = event.kind();
                let kept = self.pool.release(event);
                tracing::trace!(kind, kept, "released event to pool");
                result.released += 1;
            }
        }

        let leftover = self.pending_len();
        if leftover > 0 {
            match self.config.reentrancy {
                ReentrancyPolicy::Reject => {
                    tracing::error!(
                        pending = leftover,
                        "events were enqueued while draining a batch"
                    );
                    result.deferred = leftover;
                    self.rejected = Some(result);
                    return Err(DispatchError::InternalInvariantViolation(
                        "additional events were enqueued while draining a batch",
                    ));
                }
                ReentrancyPolicy::Defer => {
                    tracing::debug!(pending = leftover, "deferring events to the next batch");
                    result.deferred = leftover;
                }
            }
        }

        tracing::debug!(
            dispatched = result.dispatched,
            retained = result.retained.len(),
            errors = result.errors.len(),
            "event batch drained"
        );
        Ok(result)
    }

    /// Keep draining until the queue is empty or `max_batches` batches ran.
    ///
    /// Events still pending when the bound is hit are counted in
    /// [`BatchResult::deferred`]. If a batch is rejected, the outcome of every
    /// batch run so far is kept for [`BatchRunner::take_rejected`].
    pub fn run_until_idle(&mut self, max_batches: usize) -> Result<BatchResult<I, H::Node, P>> {
        let mut total = self.rejected.take().unwrap_or_default();
        for _ in 0..max_batches {
            if self.pending_len() == 0 {
                break;
            }
            match self.run_pending() {
                Ok(batch) => total.absorb(batch),
                Err(err) => {
                    if let Some(rejected) = self.rejected.take() {
                        total.absorb(rejected);
                    }
                    self.rejected = Some(total);
                    return Err(err);
                }
            }
        }
        total.deferred = self.pending_len();
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IdentityHost, Listener, listener};
    use alloc::vec;

    type Runner = BatchRunner<u32, IdentityHost, &'static str>;
    type Event = BatchEvent<u32, IdentityHost, &'static str>;
    type Log = Rc<RefCell<Vec<u32>>>;

    fn recording(log: &Log) -> Listener<u32, u32, &'static str> {
        let log = Rc::clone(log);
        listener(move |_, inst| {
            log.borrow_mut().push(*inst);
            Ok(false)
        })
    }

    fn failing(message: &'static str) -> Listener<u32, u32, &'static str> {
        listener(move |_, _| Err(HandlerError::new(message)))
    }

    fn event(
        runner: &mut Runner,
        kind: EventKind,
        dispatches: Vec<(Listener<u32, u32, &'static str>, u32)>,
    ) -> Event {
        let mut e = runner.acquire(kind);
        for (l, i) in dispatches {
            e.accumulate_dispatch(l, i);
        }
        e
    }

    #[test]
    fn empty_queue_is_a_noop() {
        let mut runner = Runner::new(IdentityHost);
        let result = runner.run_pending().unwrap();
        assert_eq!(result.dispatched, 0);
        assert!(result.is_clean());
        assert!(result.retained.is_empty());
    }

    #[test]
    fn drains_in_arrival_order_and_releases_non_persistent() {
        let log: Log = Rc::default();
        let mut runner = Runner::new(IdentityHost);
        let e1 = event(&mut runner, "click", vec![(recording(&log), 1), (recording(&log), 2)]);
        let mut e2 = event(&mut runner, "click", vec![(recording(&log), 3)]).with_payload("keep");
        e2.persist();

        let result = runner
            .run_events_in_batch(Accumulated::Many(vec![e1, e2]))
            .unwrap();

        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert_eq!(result.dispatched, 2);
        assert_eq!(result.released, 1);
        assert_eq!(runner.pool().available("click"), 1, "E1 went back to the pool");

        assert_eq!(result.retained.len(), 1);
        let kept = &result.retained[0];
        assert!(kept.is_persistent());
        assert_eq!(kept.payload(), Some(&"keep"), "E2 stays intact");
        assert!(!kept.has_dispatches());

        let recycled = runner.acquire("click");
        assert!(recycled.payload().is_none());
        assert!(!recycled.is_persistent());
    }

    #[test]
    fn consecutive_calls_accumulate_before_draining() {
        let log: Log = Rc::default();
        let mut runner = Runner::new(IdentityHost);
        let e1 = event(&mut runner, "click", vec![(recording(&log), 1)]);
        let e2 = event(&mut runner, "click", vec![(recording(&log), 2)]);
        runner.enqueue(Accumulated::One(e1)).unwrap();
        assert_eq!(runner.pending_len(), 1);
        let result = runner.run_events_in_batch(Accumulated::One(e2)).unwrap();
        assert_eq!(result.dispatched, 2);
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(runner.pending_len(), 0);
    }

    #[test]
    fn first_error_surfaces_after_whole_batch() {
        let log: Log = Rc::default();
        let mut runner = Runner::new(IdentityHost);
        let e1 = event(&mut runner, "click", vec![(failing("A"), 1), (recording(&log), 2)]);
        let e2 = event(&mut runner, "click", vec![(failing("B"), 3), (recording(&log), 4)]);

        let result = runner
            .run_events_in_batch(Accumulated::Many(vec![e1, e2]))
            .unwrap();
        assert_eq!(*log.borrow(), vec![2, 4], "both events fully drained");
        assert_eq!(result.dispatched, 2);
        assert_eq!(result.first_error(), Some(&HandlerError::new("A")));
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.into_result().unwrap_err(), HandlerError::new("A"));
    }

    #[test]
    fn reentrant_enqueue_is_deferred_to_next_batch() {
        let log: Log = Rc::default();
        let mut runner = Runner::new(IdentityHost);
        let mailbox = runner.mailbox();
        let follow_up = {
            let log = Rc::clone(&log);
            listener(move |_, inst: &u32| {
                log.borrow_mut().push(*inst);
                let mut e3: Event = SyntheticEvent::new("follow-up");
                e3.accumulate_dispatch(recording(&log), 30);
                mailbox.post(e3);
                Ok(false)
            })
        };
        let e1 = event(&mut runner, "click", vec![(follow_up, 1)]);
        let e2 = event(&mut runner, "click", vec![(recording(&log), 2)]);

        let first = runner
            .run_events_in_batch(Accumulated::Many(vec![e1, e2]))
            .unwrap();
        assert_eq!(*log.borrow(), vec![1, 2], "E3 must not join the batch in flight");
        assert_eq!(first.dispatched, 2);
        assert_eq!(first.deferred, 1);
        assert_eq!(runner.pending_len(), 1);

        let second = runner.run_pending().unwrap();
        assert_eq!(*log.borrow(), vec![1, 2, 30]);
        assert_eq!(second.dispatched, 1);
        assert_eq!(second.deferred, 0);
        assert_eq!(runner.pool().available("follow-up"), 1);
    }

    #[test]
    fn reentrant_enqueue_is_rejected_when_configured() {
        let log: Log = Rc::default();
        let mut runner = Runner::with_config(
            IdentityHost,
            BatchConfig {
                reentrancy: ReentrancyPolicy::Reject,
                ..BatchConfig::default()
            },
        );
        let mailbox = runner.mailbox();
        let poster = listener(move |_, _: &u32| {
            mailbox.post(SyntheticEvent::new("follow-up"));
            Ok(false)
        });
        let e1 = event(&mut runner, "click", vec![(poster, 1)]);
        let e2 = event(&mut runner, "click", vec![(recording(&log), 2)]);

        let err = runner
            .run_events_in_batch(Accumulated::Many(vec![e1, e2]))
            .unwrap_err();
        assert!(matches!(err, DispatchError::InternalInvariantViolation(_)));
        assert_eq!(*log.borrow(), vec![2], "the batch still drained fully");
        assert_eq!(runner.pending_len(), 1, "the stray event stays queued");
    }

    fn rejecting_runner() -> Runner {
        Runner::with_config(
            IdentityHost,
            BatchConfig {
                reentrancy: ReentrancyPolicy::Reject,
                ..BatchConfig::default()
            },
        )
    }

    /// E1 is persistent and fails with "A"; E2 posts a follow-up event.
    fn failing_then_posting(runner: &mut Runner) -> Accumulated<Event> {
        let mailbox = runner.mailbox();
        let poster = listener(move |_, _: &u32| {
            mailbox.post(SyntheticEvent::new("follow-up"));
            Ok(false)
        });
        let mut e1 = event(runner, "click", vec![(failing("A"), 1)]).with_payload("keep");
        e1.persist();
        let e2 = event(runner, "click", vec![(poster, 2)]);
        Accumulated::Many(vec![e1, e2])
    }

    #[test]
    fn rejected_batch_keeps_errors_and_retained_events() {
        let mut runner = rejecting_runner();
        let batch = failing_then_posting(&mut runner);

        let err = runner.run_events_in_batch(batch).unwrap_err();
        assert!(matches!(err, DispatchError::InternalInvariantViolation(_)));
        assert_eq!(runner.pool().available("click"), 1, "only E2 was released");

        let rejected = runner.take_rejected().expect("outcome is kept");
        assert_eq!(rejected.dispatched, 2);
        assert_eq!(rejected.deferred, 1);
        assert_eq!(rejected.first_error(), Some(&HandlerError::new("A")));
        assert_eq!(rejected.retained.len(), 1);
        assert_eq!(rejected.retained[0].payload(), Some(&"keep"));
        assert!(runner.take_rejected().is_none());
    }

    #[test]
    fn rejected_outcome_joins_the_next_result() {
        let mut runner = rejecting_runner();
        let batch = failing_then_posting(&mut runner);
        assert!(runner.run_events_in_batch(batch).is_err());

        let next = runner.run_pending().unwrap();
        assert_eq!(next.dispatched, 3, "E1, E2 and the follow-up");
        assert_eq!(next.deferred, 0);
        assert_eq!(next.errors, vec![HandlerError::new("A")]);
        assert_eq!(next.retained.len(), 1);
        assert!(next.retained[0].is_persistent());
        assert!(runner.take_rejected().is_none());
    }

    #[test]
    fn run_until_idle_keeps_outcomes_across_rejections() {
        let mut runner = rejecting_runner();
        let batch = failing_then_posting(&mut runner);
        assert!(runner.run_events_in_batch(batch).is_err());

        let mailbox = runner.mailbox();
        let again = listener(move |_, _: &u32| {
            mailbox.post(SyntheticEvent::new("follow-up"));
            Err(HandlerError::new("B"))
        });
        let e3 = event(&mut runner, "click", vec![(again, 3)]);
        runner.enqueue(Accumulated::One(e3)).unwrap();

        let err = runner.run_until_idle(4).unwrap_err();
        assert!(matches!(err, DispatchError::InternalInvariantViolation(_)));
        let rejected = runner.take_rejected().expect("outcome is kept");
        assert_eq!(rejected.dispatched, 4);
        assert_eq!(
            rejected.errors,
            vec![HandlerError::new("A"), HandlerError::new("B")]
        );
        assert_eq!(rejected.retained.len(), 1);
        assert_eq!(rejected.deferred, 1);
    }

    #[test]
    fn run_until_idle_drains_chained_events() {
        let log: Log = Rc::default();
        let mut runner = Runner::new(IdentityHost);
        let mailbox = runner.mailbox();
        let chain = {
            let log = Rc::clone(&log);
            let mailbox = mailbox.clone();
            listener(move |e: &mut Event, inst: &u32| {
                log.borrow_mut().push(*inst);
                let mut next: Event = SyntheticEvent::new(e.kind());
                next.accumulate_dispatch(recording(&log), *inst + 1);
                mailbox.post(next);
                Ok(false)
            })
        };
        // Each follow-up uses a plain recorder, so the chain is two batches long.
        let e = event(&mut runner, "click", vec![(chain, 1)]);
        runner.enqueue(Accumulated::One(e)).unwrap();
        let total = runner.run_until_idle(8).unwrap();
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(total.dispatched, 2);
        assert_eq!(total.deferred, 0);
        assert_eq!(mailbox.pending_len(), 0);
    }

    #[test]
    fn run_until_idle_stops_at_bound() {
        let mut runner = Runner::new(IdentityHost);
        let mailbox = runner.mailbox();
        // A listener that re-posts itself on a fresh event every time it runs.
        let slot: Rc<RefCell<Option<Listener<u32, u32, &'static str>>>> = Rc::default();
        let forever = {
            let slot = Rc::clone(&slot);
            listener(move |_: &mut Event, inst: &u32| {
                if let Some(me) = slot.borrow().clone() {
                    let mut next: Event = SyntheticEvent::new("loop");
                    next.accumulate_dispatch(me, *inst);
                    mailbox.post(next);
                }
                Ok(false)
            })
        };
        *slot.borrow_mut() = Some(Rc::clone(&forever));

        let e = event(&mut runner, "loop", vec![(forever, 0)]);
        runner.enqueue(Accumulated::One(e)).unwrap();
        let total = runner.run_until_idle(3).unwrap();
        assert_eq!(total.dispatched, 3);
        assert_eq!(total.deferred, 1);
        assert_eq!(runner.pending_len(), 1);
        slot.borrow_mut().take();
    }

    #[test]
    fn mailbox_rejects_empty_post_all() {
        let runner = Runner::new(IdentityHost);
        let err = runner.mailbox().post_all(Accumulated::Empty).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidArgument(_)));
        assert_eq!(runner.pending_len(), 0);
    }

    #[test]
    fn absorb_keeps_error_order() {
        let mut a: BatchResult<u32, u32> = BatchResult::default();
        a.errors.push(HandlerError::new("A"));
        a.dispatched = 1;
        let mut b: BatchResult<u32, u32> = BatchResult::default();
        b.errors.push(HandlerError::new("B"));
        b.dispatched = 2;
        b.deferred = 4;
        a.absorb(b);
        assert_eq!(a.dispatched, 3);
        assert_eq!(a.deferred, 4);
        assert_eq!(a.first_error(), Some(&HandlerError::new("A")));
    }
}
