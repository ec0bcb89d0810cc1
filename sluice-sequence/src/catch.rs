// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Catch operator that recovers from an upstream failure with a fallback sequence.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, SluiceError, Upstream};
use std::sync::Arc;

/// Extension trait providing [`catch`](CatchExt::catch).
pub trait CatchExt: Sequence + Sized {
    /// Recover from a failure of this sequence.
    ///
    /// On failure, `handler` receives the error and the failed sequence. Returning
    /// `Some(fallback)` continues the output with the values of `fallback`; returning
    /// `None` rethrows the original error.
    ///
    /// # Behavior
    ///
    /// - The handler is consulted at most once per cursor; a failure of the fallback
    ///   propagates unchanged
    /// - Values yielded before the failure are not replayed
    /// - Returning the failed sequence itself retries it from the start
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_core::SluiceError;
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let live = iter(vec![10, 11, 12]).try_map(|price| match price {
    ///     12 => Err(SluiceError::stream_error("feed dropped")),
    ///     price => Ok(price),
    /// });
    /// let recovered = live.catch(|_error, _failed| Some(iter(vec![-1])));
    ///
    /// assert_eq!(recovered.collect().await?, vec![10, 11, -1]);
    /// # Ok(())
    /// # }
    /// ```
    fn catch<F, R>(self, handler: F) -> Catch<Self, F>
    where
        F: Fn(SluiceError, Arc<Self>) -> Option<R> + Send + Sync + 'static,
        R: Sequence<Item = Self::Item>;
}

impl<S: Sequence> CatchExt for S {
    fn catch<F, R>(self, handler: F) -> Catch<Self, F>
    where
        F: Fn(SluiceError, Arc<Self>) -> Option<R> + Send + Sync + 'static,
        R: Sequence<Item = Self::Item>,
    {
        Catch {
            source: Arc::new(self),
            handler: Arc::new(handler),
        }
    }
}

/// Sequence returned by [`CatchExt::catch`].
pub struct Catch<S, F> {
    source: Arc<S>,
    handler: Arc<F>,
}

impl<S, F, R> Sequence for Catch<S, F>
where
    S: Sequence,
    F: Fn(SluiceError, Arc<S>) -> Option<R> + Send + Sync + 'static,
    R: Sequence<Item = S::Item>,
{
    type Item = S::Item;
    type Cursor = CatchCursor<S, F, R>;

    fn open(&self) -> Self::Cursor {
        CatchCursor {
            source: Arc::clone(&self.source),
            handler: Arc::clone(&self.handler),
            stage: Stage::Primary(Upstream::new(Arc::clone(&self.source))),
        }
    }
}

enum Stage<S: Sequence, R: Sequence> {
    Primary(Upstream<S>),
    Fallback(Upstream<R>),
}

/// Cursor of [`Catch`].
pub struct CatchCursor<S: Sequence, F, R: Sequence> {
    source: Arc<S>,
    handler: Arc<F>,
    stage: Stage<S, R>,
}

#[async_trait]
impl<S, F, R> Cursor for CatchCursor<S, F, R>
where
    S: Sequence,
    F: Fn(SluiceError, Arc<S>) -> Option<R> + Send + Sync + 'static,
    R: Sequence<Item = S::Item>,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        let error = match &mut self.stage {
            Stage::Fallback(fallback) => return fallback.pull().await,
            Stage::Primary(primary) => match primary.pull().await {
                Err(error) => error,
                done_or_value => return done_or_value,
            },
        };

        // The primary upstream already closed itself after failing
        let Some(fallback) = (self.handler)(error.clone(), Arc::clone(&self.source)) else {
            return Err(error);
        };
        debug!("catch: resuming from fallback after: {error}");

        let mut fallback = Upstream::new(Arc::new(fallback));
        let first = fallback.pull().await;
        self.stage = Stage::Fallback(fallback);
        first
    }

    async fn close(&mut self) -> Result<()> {
        match &mut self.stage {
            Stage::Primary(primary) => primary.close().await,
            Stage::Fallback(fallback) => fallback.close().await,
        }
    }
}
