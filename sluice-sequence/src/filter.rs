// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Filter operator that drops values rejected by a predicate.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`filter`](FilterExt::filter).
pub trait FilterExt: Sequence + Sized {
    /// Yield only the values for which `predicate` returns `true`.
    ///
    /// # Behavior
    ///
    /// - **Rejected values**: dropped; the cursor pulls again until a value is accepted
    ///   or the upstream ends, so a single downstream pull may consume many upstream
    ///   values
    /// - **Errors**: pass through and end the cursor
    /// - **Ordering**: preserved
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let large_orders = iter(vec![50, 1_200, 30, 5_000]).filter(|qty| *qty >= 1_000);
    /// assert_eq!(large_orders.collect().await?, vec![1_200, 5_000]);
    /// # Ok(())
    /// # }
    /// ```
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Item) -> bool + Send + Sync + 'static;
}

impl<S: Sequence> FilterExt for S {
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
    {
        Filter {
            source: Arc::new(self),
            predicate: Arc::new(predicate),
        }
    }
}

/// Sequence returned by [`FilterExt::filter`].
pub struct Filter<S, F> {
    source: Arc<S>,
    predicate: Arc<F>,
}

impl<S, F> Sequence for Filter<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
    type Item = S::Item;
    type Cursor = FilterCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        FilterCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

/// Cursor of [`Filter`].
pub struct FilterCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    predicate: Arc<F>,
}

#[async_trait]
impl<S, F> Cursor for FilterCursor<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        while let Some(value) = self.upstream.pull().await? {
            if (self.predicate)(&value) {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.close().await
    }
}
