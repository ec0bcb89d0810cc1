// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combine-latest: emit the latest value of every source whenever any of them changes.

use crate::fan_in::FanIn;
use async_trait::async_trait;
use sluice_core::{BoxSequence, Cursor, Result, Sequence};
use std::sync::Arc;

/// Snapshot of the latest value of every source, in source order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CombinedState<V> {
    state: Vec<V>,
}

impl<V> CombinedState<V> {
    pub fn new(state: Vec<V>) -> Self {
        Self { state }
    }

    /// The latest values, indexed like the sources.
    pub fn get_state(&self) -> &Vec<V> {
        &self.state
    }

    pub fn into_inner(self) -> Vec<V> {
        self.state
    }
}

/// Combine `sources` into a sequence of [`CombinedState`] snapshots.
///
/// # Behavior
///
/// - All sources are pulled concurrently
/// - Nothing is emitted until every source has produced at least one value
/// - From then on, every new value from any source emits a fresh snapshot with that
///   source's entry replaced
/// - A completed source keeps its last value in every later snapshot; the output
///   completes once every source completed
/// - A failing source closes all other open sources, then the failure is returned
///
/// # Examples
///
/// ```
/// use sluice_sequence::prelude::*;
/// use sluice_sequence::{combine_latest, iter};
///
/// # #[tokio::main]
/// # async fn main() -> sluice_core::Result<()> {
/// let snapshots = combine_latest(vec![iter(vec![1]), iter(vec![10])]);
/// let first = snapshots.take_first().await?;
/// assert_eq!(first.map(|s| s.into_inner()), Some(vec![1, 10]));
/// # Ok(())
/// # }
/// ```
pub fn combine_latest<I, S>(sources: I) -> CombineLatest<S>
where
    I: IntoIterator<Item = S>,
    S: Sequence,
    S::Item: Clone,
{
    CombineLatest {
        sources: sources.into_iter().map(Arc::new).collect(),
    }
}

/// Extension trait providing [`combine_latest_with`](CombineLatestExt::combine_latest_with).
pub trait CombineLatestExt: Sequence + Sized {
    /// Combine this sequence with `others`; this sequence comes first in every snapshot.
    fn combine_latest_with(
        self,
        others: Vec<BoxSequence<Self::Item>>,
    ) -> CombineLatest<BoxSequence<Self::Item>>
    where
        Self::Item: Clone;
}

impl<S: Sequence> CombineLatestExt for S {
    fn combine_latest_with(
        self,
        others: Vec<BoxSequence<Self::Item>>,
    ) -> CombineLatest<BoxSequence<Self::Item>>
    where
        Self::Item: Clone,
    {
        combine_latest(std::iter::once(self.boxed()).chain(others))
    }
}

/// Sequence returned by [`combine_latest`].
pub struct CombineLatest<S> {
    sources: Arc<[Arc<S>]>,
}

impl<S> Sequence for CombineLatest<S>
where
    S: Sequence,
    S::Item: Clone,
{
    type Item = CombinedState<S::Item>;
    type Cursor = CombineLatestCursor<S>;

    fn open(&self) -> Self::Cursor {
        CombineLatestCursor {
            fan_in: FanIn::new(&self.sources),
            latest: vec![None; self.sources.len()],
        }
    }
}

/// Cursor of [`CombineLatest`].
pub struct CombineLatestCursor<S: Sequence> {
    fan_in: FanIn<S>,
    latest: Vec<Option<S::Item>>,
}

impl<S> CombineLatestCursor<S>
where
    S: Sequence,
    S::Item: Clone,
{
    fn snapshot(&self) -> Option<CombinedState<S::Item>> {
        self.latest
            .iter()
            .cloned()
            .collect::<Option<Vec<_>>>()
            .map(CombinedState::new)
    }
}

#[async_trait]
impl<S> Cursor for CombineLatestCursor<S>
where
    S: Sequence,
    S::Item: Clone,
{
    type Item = CombinedState<S::Item>;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        while let Some((index, result)) = self.fan_in.next().await {
            match result {
                Ok(Some(value)) => {
                    self.latest[index] = Some(value);
                    self.fan_in.arm(index);
                    if let Some(snapshot) = self.snapshot() {
                        return Ok(Some(snapshot));
                    }
                }
                Ok(None) => self.fan_in.retire(index),
                Err(error) => return Err(self.fan_in.fail(index, error).await),
            }
        }
        self.latest.clear();
        self.fan_in.close().await?;
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.latest.clear();
        self.fan_in.close().await
    }
}
