// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Append operator that adds fixed values after a sequence completes.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`append`](AppendExt::append).
pub trait AppendExt: Sequence + Sized {
    /// Yield `trailing` after this sequence completes.
    ///
    /// The trailing values are yielded only on normal completion. A failure of the
    /// upstream ends the cursor with that failure, and closing the cursor early skips
    /// them.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let with_marker = iter(vec!["tick", "tick"]).append(vec!["end-of-day"]);
    /// assert_eq!(with_marker.collect().await?, vec!["tick", "tick", "end-of-day"]);
    /// # Ok(())
    /// # }
    /// ```
    fn append(self, trailing: Vec<Self::Item>) -> Append<Self>
    where
        Self::Item: Clone + Sync;
}

impl<S: Sequence> AppendExt for S {
    fn append(self, trailing: Vec<Self::Item>) -> Append<Self>
    where
        Self::Item: Clone + Sync,
    {
        Append {
            source: Arc::new(self),
            trailing: Arc::new(trailing),
        }
    }
}

/// Sequence returned by [`AppendExt::append`].
pub struct Append<S: Sequence> {
    source: Arc<S>,
    trailing: Arc<Vec<S::Item>>,
}

impl<S> Sequence for Append<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    type Item = S::Item;
    type Cursor = AppendCursor<S>;

    fn open(&self) -> Self::Cursor {
        AppendCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            trailing: Arc::clone(&self.trailing),
            position: None,
        }
    }
}

/// Cursor of [`Append`].
pub struct AppendCursor<S: Sequence> {
    upstream: Upstream<S>,
    trailing: Arc<Vec<S::Item>>,
    // Some once the upstream has completed
    position: Option<usize>,
}

#[async_trait]
impl<S> Cursor for AppendCursor<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.position.is_none() {
            match self.upstream.pull().await {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => self.position = Some(0),
                Err(error) => {
                    // A failed cursor stays finished
                    self.position = Some(self.trailing.len());
                    return Err(error);
                }
            }
        }

        let position = self.position.unwrap_or(self.trailing.len());
        let value = self.trailing.get(position).cloned();
        if value.is_some() {
            self.position = Some(position + 1);
        }
        Ok(value)
    }

    async fn close(&mut self) -> Result<()> {
        self.position = Some(self.trailing.len());
        self.upstream.close().await
    }
}
