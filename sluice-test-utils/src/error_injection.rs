// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for error injection in sequences.
//!
//! [`ErrorInjectingSequence`] makes one pull fail; [`CloseFailingSequence`] makes every
//! close fail. Together they cover both directions of error propagation: failures
//! flowing downstream from a pull, and failures surfacing from upstream cleanup.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, SluiceError};

/// A sequence wrapper that fails the pull at a given position.
///
/// Pulls before `inject_error_at` (0-indexed) are forwarded to the inner sequence.
/// The pull at that position closes the inner cursor and fails with a
/// [`SluiceError::StreamProcessingError`]; the cursor is finished afterwards.
///
/// # Examples
///
/// ```rust
/// use sluice_core::{Cursor, Sequence};
/// use sluice_test_utils::{counter, ErrorInjectingSequence};
///
/// # #[tokio::main]
/// # async fn main() {
/// let failing = ErrorInjectingSequence::new(counter(), 1);
/// let mut cursor = failing.open();
///
/// assert_eq!(cursor.pull().await.unwrap(), Some(0));
/// assert!(cursor.pull().await.is_err());
/// assert_eq!(cursor.pull().await.unwrap(), None);
/// # }
/// ```
pub struct ErrorInjectingSequence<S> {
    inner: S,
    inject_error_at: usize,
}

impl<S> ErrorInjectingSequence<S> {
    /// Creates a new error-injecting sequence wrapper.
    pub fn new(inner: S, inject_error_at: usize) -> Self {
        Self {
            inner,
            inject_error_at,
        }
    }
}

impl<S: Sequence> Sequence for ErrorInjectingSequence<S> {
    type Item = S::Item;
    type Cursor = ErrorInjectingCursor<S::Cursor>;

    fn open(&self) -> Self::Cursor {
        ErrorInjectingCursor {
            inner: Some(self.inner.open()),
            inject_error_at: self.inject_error_at,
            count: 0,
        }
    }
}

/// Cursor of an [`ErrorInjectingSequence`].
pub struct ErrorInjectingCursor<C> {
    inner: Option<C>,
    inject_error_at: usize,
    count: usize,
}

#[async_trait]
impl<C: Cursor> Cursor for ErrorInjectingCursor<C> {
    type Item = C::Item;

    async fn pull(&mut self) -> Result<Option<C::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };

        if self.count == self.inject_error_at {
            let _ = inner.close().await;
            self.inner = None;
            return Err(SluiceError::stream_error("Injected test error"));
        }

        self.count += 1;
        let result = inner.pull().await;
        if !matches!(result, Ok(Some(_))) {
            self.inner = None;
        }
        result
    }

    async fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.close().await,
            None => Ok(()),
        }
    }
}

/// A sequence wrapper whose cursors fail to close.
///
/// The inner cursor is still closed; the wrapper then reports `message` as a
/// [`SluiceError::StreamProcessingError`]. Only the first close of a cursor fails.
pub struct CloseFailingSequence<S> {
    inner: S,
    message: &'static str,
}

impl<S> CloseFailingSequence<S> {
    /// Creates a new close-failing sequence wrapper.
    pub fn new(inner: S, message: &'static str) -> Self {
        Self { inner, message }
    }
}

impl<S: Sequence> Sequence for CloseFailingSequence<S> {
    type Item = S::Item;
    type Cursor = CloseFailingCursor<S::Cursor>;

    fn open(&self) -> Self::Cursor {
        CloseFailingCursor {
            inner: self.inner.open(),
            message: self.message,
            closed: false,
        }
    }
}

/// Cursor of a [`CloseFailingSequence`].
pub struct CloseFailingCursor<C> {
    inner: C,
    message: &'static str,
    closed: bool,
}

#[async_trait]
impl<C: Cursor> Cursor for CloseFailingCursor<C> {
    type Item = C::Item;

    async fn pull(&mut self) -> Result<Option<C::Item>> {
        if self.closed {
            return Ok(None);
        }
        self.inner.pull().await
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.close().await?;
        Err(SluiceError::stream_error(self.message))
    }
}
