// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulator: merge items into a collection that stays unallocated until it
//! holds more than one item.
//!
//! ## Overview
//!
//! [`Accumulated`] is empty, a single item, or an ordered sequence. It backs
//! both the pending event queue of the [batch runner](crate::batch) and the
//! per-event [`Dispatches`](crate::types::Dispatches).
//!
//! ## Minimal example
//!
//! ```
//! use understory_dispatch::accumulate::Accumulated;
//!
//! let mut acc = Accumulated::Empty;
//! acc.accumulate_into(Accumulated::One(1)).unwrap();
//! assert_eq!(acc, Accumulated::One(1));
//! acc.accumulate_into(vec![2, 3].into()).unwrap();
//! assert_eq!(acc, Accumulated::Many(vec![1, 2, 3]));
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{DispatchError, Result};

/// Zero, one, or many items in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Accumulated<T> {
    /// Nothing accumulated.
    #[default]
    Empty,
    /// Exactly one item, held without allocating.
    One(T),
    /// An ordered sequence of items.
    Many(Vec<T>),
}

impl<T> Accumulated<T> {
    /// Returns `true` when nothing is accumulated.
    ///
    /// A `Many` holding an empty vector also counts as empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of accumulated items.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(v) => v.len(),
        }
    }

    /// Returns `true` when the items are held as a sequence.
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// View the accumulated items as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::One(t) => core::slice::from_ref(t),
            Self::Many(v) => v,
        }
    }

    /// View the accumulated items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Self::Empty => &mut [],
            Self::One(t) => core::slice::from_mut(t),
            Self::Many(v) => v,
        }
    }

    /// Iterate the accumulated items in arrival order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Take the accumulated items, leaving `Empty` behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Append one item after those already accumulated.
    pub fn push(&mut self, item: T) {
        *self = match self.take() {
            Self::Empty => Self::One(item),
            Self::One(c) => Self::Many(vec![c, item]),
            Self::Many(mut v) => {
                v.push(item);
                Self::Many(v)
            }
        };
    }

    /// Merge `current` and `next` into one ordered collection.
    ///
    /// - `next` must not be empty; that fails with
    ///   [`DispatchError::InvalidArgument`].
    /// - An empty `current` returns `next` unchanged.
    /// - A sequence `current` is extended in place.
    /// - A single `current` becomes a new sequence, followed by `next`.
    pub fn accumulate(current: Self, next: Self) -> Result<Self> {
        const EMPTY_NEXT: DispatchError =
            DispatchError::InvalidArgument("accumulated items must not be empty");
        Ok(match (current, next) {
            (_, Self::Empty) => return Err(EMPTY_NEXT),
            (_, Self::Many(w)) if w.is_empty() => return Err(EMPTY_NEXT),
            (Self::Empty, next) => next,
            (Self::Many(v), next) if v.is_empty() => next,
            (Self::Many(mut v), Self::One(t)) => {
                v.push(t);
                Self::Many(v)
            }
            (Self::Many(mut v), Self::Many(w)) => {
                v.extend(w);
                Self::Many(v)
            }
            (Self::One(c), Self::One(t)) => Self::Many(vec![c, t]),
            (Self::One(c), Self::Many(w)) => {
                let mut v = Vec::with_capacity(w.len() + 1);
                v.push(c);
                v.extend(w);
                Self::Many(v)
            }
        })
    }

    /// In-place form of [`Accumulated::accumulate`].
    ///
    /// On error `self` is left untouched.
    pub fn accumulate_into(&mut self, next: Self) -> Result<()> {
        if next.is_empty() {
            return Err(DispatchError::InvalidArgument(
                "accumulated items must not be empty",
            ));
        }
        let current = self.take();
        *self = Self::accumulate(current, next)?;
        Ok(())
    }

    /// Consume into a vector, allocating only for the `One` case.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Empty => Vec::new(),
            Self::One(t) => vec![t],
            Self::Many(v) => v,
        }
    }
}

impl<T> From<Vec<T>> for Accumulated<T> {
    /// An empty vector becomes `Empty`; anything else is kept as a sequence.
    fn from(v: Vec<T>) -> Self {
        if v.is_empty() {
            Self::Empty
        } else {
            Self::Many(v)
        }
    }
}

impl<T> From<Option<T>> for Accumulated<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(t) => Self::One(t),
            None => Self::Empty,
        }
    }
}

/// Owning iterator over [`Accumulated`] items in arrival order.
#[derive(Debug)]
pub struct IntoIter<T> {
    inner: IntoIterInner<T>,
}

#[derive(Debug)]
enum IntoIterInner<T> {
    One(core::option::IntoIter<T>),
    Many(vec::IntoIter<T>),
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match &mut self.inner {
            IntoIterInner::One(it) => it.next(),
            IntoIterInner::Many(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IntoIterInner::One(it) => it.size_hint(),
            IntoIterInner::Many(it) => it.size_hint(),
        }
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Accumulated<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let inner = match self {
            Self::Empty => IntoIterInner::One(None.into_iter()),
            Self::One(t) => IntoIterInner::One(Some(t).into_iter()),
            Self::Many(v) => IntoIterInner::Many(v.into_iter()),
        };
        IntoIter { inner }
    }
}

impl<'a, T> IntoIterator for &'a Accumulated<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
