// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sentinel sequences: [`empty`] completes immediately, [`hanging`] never yields.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence};
use std::marker::PhantomData;

/// A sequence that completes on the first pull.
pub fn empty<T: Send + 'static>() -> Empty<T> {
    Empty {
        _marker: PhantomData,
    }
}

/// A sequence whose pulls never resolve until the cursor is closed.
///
/// Useful as a placeholder source and for exercising cancellation: a pull on a hanging
/// cursor only ends when its future is dropped, for example by racing it against a
/// timeout or a [`take_until`](crate::TakeUntilExt::take_until) trigger.
pub fn hanging<T: Send + 'static>() -> Hanging<T> {
    Hanging {
        _marker: PhantomData,
    }
}

/// Sequence returned by [`empty`].
pub struct Empty<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Sequence for Empty<T> {
    type Item = T;
    type Cursor = EmptyCursor<T>;

    fn open(&self) -> Self::Cursor {
        EmptyCursor {
            _marker: PhantomData,
        }
    }
}

/// Cursor of [`Empty`].
pub struct EmptyCursor<T> {
    _marker: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: Send + 'static> Cursor for EmptyCursor<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Option<T>> {
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sequence returned by [`hanging`].
pub struct Hanging<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Sequence for Hanging<T> {
    type Item = T;
    type Cursor = HangingCursor<T>;

    fn open(&self) -> Self::Cursor {
        HangingCursor {
            closed: false,
            _marker: PhantomData,
        }
    }
}

/// Cursor of [`Hanging`].
pub struct HangingCursor<T> {
    closed: bool,
    _marker: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T: Send + 'static> Cursor for HangingCursor<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Option<T>> {
        if self.closed {
            return Ok(None);
        }
        futures::future::pending().await
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
