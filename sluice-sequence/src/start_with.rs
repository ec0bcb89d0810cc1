// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Start-with operator that prepends fixed values to a sequence.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`start_with`](StartWithExt::start_with).
pub trait StartWithExt: Sequence + Sized {
    /// Yield `initial` before the values of this sequence.
    ///
    /// # Behavior
    ///
    /// - The upstream is not opened until every initial value has been yielded
    /// - Closing while initial values remain never opens the upstream
    /// - Each cursor replays the full list of initial values
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let with_snapshot = iter(vec![101, 102]).start_with(vec![99, 100]);
    /// assert_eq!(with_snapshot.collect().await?, vec![99, 100, 101, 102]);
    /// # Ok(())
    /// # }
    /// ```
    fn start_with(self, initial: Vec<Self::Item>) -> StartWith<Self>
    where
        Self::Item: Clone + Sync;
}

impl<S: Sequence> StartWithExt for S {
    fn start_with(self, initial: Vec<Self::Item>) -> StartWith<Self>
    where
        Self::Item: Clone + Sync,
    {
        StartWith {
            source: Arc::new(self),
            initial: Arc::new(initial),
        }
    }
}

/// Sequence returned by [`StartWithExt::start_with`].
pub struct StartWith<S: Sequence> {
    source: Arc<S>,
    initial: Arc<Vec<S::Item>>,
}

impl<S> Sequence for StartWith<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    type Item = S::Item;
    type Cursor = StartWithCursor<S>;

    fn open(&self) -> Self::Cursor {
        StartWithCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            initial: Arc::clone(&self.initial),
            position: 0,
        }
    }
}

/// Cursor of [`StartWith`].
pub struct StartWithCursor<S: Sequence> {
    upstream: Upstream<S>,
    initial: Arc<Vec<S::Item>>,
    position: usize,
}

#[async_trait]
impl<S> Cursor for StartWithCursor<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if let Some(value) = self.initial.get(self.position) {
            self.position += 1;
            return Ok(Some(value.clone()));
        }
        self.upstream.pull().await
    }

    async fn close(&mut self) -> Result<()> {
        self.position = self.initial.len();
        self.upstream.close().await
    }
}
