// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Take operator that limits a sequence to its first `n` values.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`take`](TakeExt::take).
pub trait TakeExt: Sequence + Sized {
    /// Yield at most `n` values, then complete.
    ///
    /// # Behavior
    ///
    /// - The upstream is closed as soon as the `n`-th value has been pulled, before that
    ///   value is handed to the consumer, so an infinite source is released promptly
    /// - Every pull after that completes without touching the upstream
    /// - `take(0)` completes on the first pull and never opens the upstream
    /// - A failure while closing the upstream after the last value is returned from
    ///   that pull; the value is lost
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let first_two = iter(0..).take(2);
    /// assert_eq!(first_two.collect().await?, vec![0, 1]);
    /// # Ok(())
    /// # }
    /// ```
    fn take(self, n: usize) -> Take<Self>;
}

impl<S: Sequence> TakeExt for S {
    fn take(self, n: usize) -> Take<Self> {
        Take {
            source: Arc::new(self),
            n,
        }
    }
}

/// Sequence returned by [`TakeExt::take`].
pub struct Take<S> {
    source: Arc<S>,
    n: usize,
}

impl<S: Sequence> Sequence for Take<S> {
    type Item = S::Item;
    type Cursor = TakeCursor<S>;

    fn open(&self) -> Self::Cursor {
        TakeCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            remaining: self.n,
        }
    }
}

/// Cursor of [`Take`].
pub struct TakeCursor<S: Sequence> {
    upstream: Upstream<S>,
    remaining: usize,
}

#[async_trait]
impl<S: Sequence> Cursor for TakeCursor<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.remaining == 0 {
            self.upstream.close().await?;
            return Ok(None);
        }

        let Some(value) = self.upstream.pull().await? else {
            self.remaining = 0;
            return Ok(None);
        };

        self.remaining -= 1;
        if self.remaining == 0 {
            self.upstream.close().await?;
        }
        Ok(Some(value))
    }

    async fn close(&mut self) -> Result<()> {
        self.remaining = 0;
        self.upstream.close().await
    }
}
