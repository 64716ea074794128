// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for accumulation, dispatch, and batch draining.

use alloc::string::String;

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = core::result::Result<T, DispatchError>;

/// An error returned by application-level listener code.
///
/// Listeners return `Err(HandlerError)` instead of throwing. During a batch
/// the error is captured and recorded in
/// [`BatchResult::errors`](crate::batch::BatchResult::errors) so the
/// remaining listeners and events still run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message this error was created with.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by the accumulator, the executor, and the batch runner.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// A required value was empty, or a dispatch shape was not valid for the
    /// requested operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An internal consistency check failed; the batch is abandoned.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(&'static str),

    /// A listener failed in a mode that does not defer errors.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}
