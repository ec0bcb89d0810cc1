// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pairwise operator that pairs each value with its predecessor.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`pairwise`](PairwiseExt::pairwise).
pub trait PairwiseExt: Sequence + Sized {
    /// Yield `(previous, current)` for every value after the first.
    ///
    /// A sequence with fewer than two values yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let moves = iter(vec![100, 103, 101]).pairwise().map(|(prev, cur)| cur - prev);
    /// assert_eq!(moves.collect().await?, vec![3, -2]);
    /// # Ok(())
    /// # }
    /// ```
    fn pairwise(self) -> Pairwise<Self>
    where
        Self::Item: Clone;
}

impl<S: Sequence> PairwiseExt for S {
    fn pairwise(self) -> Pairwise<Self>
    where
        Self::Item: Clone,
    {
        Pairwise {
            source: Arc::new(self),
        }
    }
}

/// Sequence returned by [`PairwiseExt::pairwise`].
pub struct Pairwise<S> {
    source: Arc<S>,
}

impl<S> Sequence for Pairwise<S>
where
    S: Sequence,
    S::Item: Clone,
{
    type Item = (S::Item, S::Item);
    type Cursor = PairwiseCursor<S>;

    fn open(&self) -> Self::Cursor {
        PairwiseCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            previous: None,
        }
    }
}

/// Cursor of [`Pairwise`].
pub struct PairwiseCursor<S: Sequence> {
    upstream: Upstream<S>,
    previous: Option<S::Item>,
}

#[async_trait]
impl<S> Cursor for PairwiseCursor<S>
where
    S: Sequence,
    S::Item: Clone,
{
    type Item = (S::Item, S::Item);

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some(current) = self.upstream.pull().await? {
            if let Some(previous) = self.previous.replace(current.clone()) {
                return Ok(Some((previous, current)));
            }
        }
        self.previous = None;
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.previous = None;
        self.upstream.close().await
    }
}
