// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cycle operator that replays a sequence indefinitely.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`cycle`](CycleExt::cycle).
pub trait CycleExt: Sequence + Sized {
    /// Replay this sequence from the start every time it completes.
    ///
    /// # Behavior
    ///
    /// - Each round opens a fresh cursor on the source once the previous one completed
    /// - A round that completes without yielding ends the output, so an empty source
    ///   does not spin
    /// - A failure in any round ends the output with that failure
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let rotation = iter(vec!["BTC", "ETH"]).cycle().take(5);
    /// assert_eq!(rotation.collect().await?, vec!["BTC", "ETH", "BTC", "ETH", "BTC"]);
    /// # Ok(())
    /// # }
    /// ```
    fn cycle(self) -> Cycle<Self>;
}

impl<S: Sequence> CycleExt for S {
    fn cycle(self) -> Cycle<Self> {
        Cycle {
            source: Arc::new(self),
        }
    }
}

/// Sequence returned by [`CycleExt::cycle`].
pub struct Cycle<S> {
    source: Arc<S>,
}

impl<S: Sequence> Sequence for Cycle<S> {
    type Item = S::Item;
    type Cursor = CycleCursor<S>;

    fn open(&self) -> Self::Cursor {
        CycleCursor {
            source: Arc::clone(&self.source),
            upstream: Upstream::new(Arc::clone(&self.source)),
            yielded_this_round: false,
            done: false,
        }
    }
}

/// Cursor of [`Cycle`].
pub struct CycleCursor<S: Sequence> {
    source: Arc<S>,
    upstream: Upstream<S>,
    yielded_this_round: bool,
    done: bool,
}

#[async_trait]
impl<S: Sequence> Cursor for CycleCursor<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        while !self.done {
            match self.upstream.pull().await {
                Ok(Some(value)) => {
                    self.yielded_this_round = true;
                    return Ok(Some(value));
                }
                Ok(None) if self.yielded_this_round => {
                    self.yielded_this_round = false;
                    self.upstream = Upstream::new(Arc::clone(&self.source));
                }
                Ok(None) => self.done = true,
                Err(error) => {
                    self.done = true;
                    return Err(error);
                }
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.done = true;
        self.upstream.close().await
    }
}
