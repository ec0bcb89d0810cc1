// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The factory side of the protocol: sequences open independent cursors.

use crate::cursor::{BoxCursor, Cursor};
use std::fmt;
use std::sync::Arc;

/// A lazy, possibly infinite, pull-based sequence of values.
///
/// A sequence is a factory: every call to [`open`](Self::open) produces an independent
/// [`Cursor`]. Opening must be cheap and must not start any production; operators
/// defer work until the first pull.
///
/// Operators take their sources by value and return new sequences, so a pipeline is
/// built once and can be opened any number of times:
///
/// ```
/// use sluice_core::Sequence;
///
/// fn open_twice<S: Sequence>(sequence: &S) -> (S::Cursor, S::Cursor) {
///     (sequence.open(), sequence.open())
/// }
/// ```
pub trait Sequence: Send + Sync + 'static {
    /// The values yielded by cursors of this sequence
    type Item: Send + 'static;

    /// The cursor type produced by [`open`](Self::open)
    type Cursor: Cursor<Item = Self::Item>;

    /// Open a new, independent cursor.
    fn open(&self) -> Self::Cursor;

    /// Erase the concrete type of this sequence.
    fn boxed(self) -> BoxSequence<Self::Item>
    where
        Self: Sized,
    {
        BoxSequence::new(self)
    }
}

impl<S> Sequence for Arc<S>
where
    S: Sequence + ?Sized,
{
    type Item = S::Item;
    type Cursor = S::Cursor;

    fn open(&self) -> Self::Cursor {
        (**self).open()
    }
}

type DynSequence<T> = dyn Sequence<Item = T, Cursor = BoxCursor<T>>;

/// A type-erased, cheaply clonable sequence.
///
/// Used wherever sequences of different concrete types must be stored together, such as
/// fan-in sources, triggers and inner sequences of `switch_map`.
pub struct BoxSequence<T> {
    inner: Arc<DynSequence<T>>,
}

impl<T: Send + 'static> BoxSequence<T> {
    /// Box any sequence yielding `T`.
    pub fn new<S>(sequence: S) -> Self
    where
        S: Sequence<Item = T>,
    {
        Self {
            inner: Arc::new(Erased(sequence)),
        }
    }
}

impl<T> Clone for BoxSequence<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for BoxSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxSequence").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Sequence for BoxSequence<T> {
    type Item = T;
    type Cursor = BoxCursor<T>;

    fn open(&self) -> Self::Cursor {
        self.inner.open()
    }

    fn boxed(self) -> BoxSequence<T> {
        self
    }
}

struct Erased<S>(S);

impl<S: Sequence> Sequence for Erased<S> {
    type Item = S::Item;
    type Cursor = BoxCursor<S::Item>;

    fn open(&self) -> Self::Cursor {
        Box::new(self.0.open())
    }
}
