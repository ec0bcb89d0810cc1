// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Simple sources for operator tests.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence};
use std::sync::Arc;
use std::time::Duration;

/// An infinite sequence yielding `0, 1, 2, ...` on every cursor.
pub fn counter() -> Counter {
    Counter
}

/// Sequence returned by [`counter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Counter;

impl Sequence for Counter {
    type Item = u64;
    type Cursor = CounterCursor;

    fn open(&self) -> Self::Cursor {
        CounterCursor {
            next: 0,
            closed: false,
        }
    }
}

/// Cursor of a [`Counter`].
pub struct CounterCursor {
    next: u64,
    closed: bool,
}

#[async_trait]
impl Cursor for CounterCursor {
    type Item = u64;

    async fn pull(&mut self) -> Result<Option<u64>> {
        if self.closed {
            return Ok(None);
        }
        let value = self.next;
        self.next += 1;
        Ok(Some(value))
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// A finite sequence that waits `delay` before yielding each of `values`.
///
/// Timing follows the tokio clock, so tests can run it with a paused clock.
pub fn delayed<T>(delay: Duration, values: Vec<T>) -> Delayed<T>
where
    T: Clone + Send + Sync + 'static,
{
    Delayed {
        delay,
        values: Arc::new(values),
    }
}

/// Sequence returned by [`delayed`].
pub struct Delayed<T> {
    delay: Duration,
    values: Arc<Vec<T>>,
}

impl<T> Sequence for Delayed<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;
    type Cursor = DelayedCursor<T>;

    fn open(&self) -> Self::Cursor {
        DelayedCursor {
            delay: self.delay,
            values: Arc::clone(&self.values),
            position: 0,
        }
    }
}

/// Cursor of a [`Delayed`].
pub struct DelayedCursor<T> {
    delay: Duration,
    values: Arc<Vec<T>>,
    position: usize,
}

#[async_trait]
impl<T> Cursor for DelayedCursor<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn pull(&mut self) -> Result<Option<T>> {
        let Some(value) = self.values.get(self.position).cloned() else {
            return Ok(None);
        };
        tokio::time::sleep(self.delay).await;
        self.position += 1;
        Ok(Some(value))
    }

    async fn close(&mut self) -> Result<()> {
        self.position = self.values.len();
        Ok(())
    }
}
