// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Merge: interleave several sequences in completion order.

use crate::fan_in::FanIn;
use async_trait::async_trait;
use sluice_core::{BoxSequence, Cursor, Result, Sequence};
use std::sync::Arc;

/// Interleave the values of `sources` in the order they become available.
///
/// # Behavior
///
/// - All sources are pulled concurrently; whichever pending pull resolves first is
///   yielded next. Values of one source keep their relative order
/// - A completed source drops out; the output completes once every source completed
/// - A failing source closes all other open sources, then the failure is returned
/// - Closing the output closes every open source concurrently
///
/// # Examples
///
/// ```
/// use sluice_sequence::prelude::*;
/// use sluice_sequence::{iter, merge};
///
/// # #[tokio::main]
/// # async fn main() -> sluice_core::Result<()> {
/// let venues = merge(vec![iter(vec![1, 2]), iter(vec![3])]);
/// let mut quotes = venues.collect().await?;
/// quotes.sort();
/// assert_eq!(quotes, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
pub fn merge<I, S>(sources: I) -> Merge<S>
where
    I: IntoIterator<Item = S>,
    S: Sequence,
{
    Merge {
        sources: sources.into_iter().map(Arc::new).collect(),
    }
}

/// Extension trait providing [`merge_with`](MergeExt::merge_with).
pub trait MergeExt: Sequence + Sized {
    /// Merge this sequence with another sequence of the same item type.
    ///
    /// The two sequences may have different concrete types; both are boxed.
    fn merge_with<O>(self, other: O) -> Merge<BoxSequence<Self::Item>>
    where
        O: Sequence<Item = Self::Item>;
}

impl<S: Sequence> MergeExt for S {
    fn merge_with<O>(self, other: O) -> Merge<BoxSequence<Self::Item>>
    where
        O: Sequence<Item = Self::Item>,
    {
        merge([self.boxed(), other.boxed()])
    }
}

/// Sequence returned by [`merge`].
pub struct Merge<S> {
    sources: Arc<[Arc<S>]>,
}

impl<S: Sequence> Sequence for Merge<S> {
    type Item = S::Item;
    type Cursor = MergeCursor<S>;

    fn open(&self) -> Self::Cursor {
        MergeCursor {
            fan_in: FanIn::new(&self.sources),
        }
    }
}

/// Cursor of [`Merge`].
pub struct MergeCursor<S: Sequence> {
    fan_in: FanIn<S>,
}

#[async_trait]
impl<S: Sequence> Cursor for MergeCursor<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        while let Some((index, result)) = self.fan_in.next().await {
            match result {
                Ok(Some(value)) => {
                    self.fan_in.arm(index);
                    return Ok(Some(value));
                }
                Ok(None) => self.fan_in.retire(index),
                Err(error) => return Err(self.fan_in.fail(index, error).await),
            }
        }
        self.fan_in.close().await?;
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.fan_in.close().await
    }
}
