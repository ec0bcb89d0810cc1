// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tap operators for side-effect observation without modifying the sequence.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::future::Future;
use std::sync::Arc;

/// Extension trait providing [`tap`](TapExt::tap) and [`tap_async`](TapExt::tap_async).
pub trait TapExt: Sequence + Sized {
    /// Invoke `f` with a reference to each value, then yield the value unchanged.
    ///
    /// Useful for logging or metrics without affecting the data flow.
    fn tap<F>(self, f: F) -> Tap<Self, F>
    where
        F: Fn(&Self::Item) + Send + Sync + 'static;

    /// Invoke an asynchronous side effect for each value and await it before the value
    /// is yielded.
    ///
    /// # Behavior
    ///
    /// - **Ordering**: the side effect for a value resolves strictly before that value
    ///   reaches the consumer
    /// - **Side-effect failure**: the upstream is closed and the error is returned from
    ///   the pull; the value is not yielded
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    /// use std::sync::Arc;
    /// use parking_lot::Mutex;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let audit = Arc::new(Mutex::new(Vec::new()));
    /// let log = Arc::clone(&audit);
    ///
    /// let orders = iter(vec!["buy", "sell"]).tap_async(move |order: &&str| {
    ///     let log = Arc::clone(&log);
    ///     let order = order.to_string();
    ///     async move {
    ///         log.lock().push(order);
    ///         Ok(())
    ///     }
    /// });
    ///
    /// assert_eq!(orders.collect().await?, vec!["buy", "sell"]);
    /// assert_eq!(*audit.lock(), vec!["buy".to_string(), "sell".to_string()]);
    /// # Ok(())
    /// # }
    /// ```
    fn tap_async<F, Fut>(self, f: F) -> TapAsync<Self, F>
    where
        F: Fn(&Self::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static;
}

impl<S: Sequence> TapExt for S {
    fn tap<F>(self, f: F) -> Tap<Self, F>
    where
        F: Fn(&Self::Item) + Send + Sync + 'static,
    {
        Tap {
            source: Arc::new(self),
            f: Arc::new(f),
        }
    }

    fn tap_async<F, Fut>(self, f: F) -> TapAsync<Self, F>
    where
        F: Fn(&Self::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        TapAsync {
            source: Arc::new(self),
            f: Arc::new(f),
        }
    }
}

/// Sequence returned by [`TapExt::tap`].
pub struct Tap<S, F> {
    source: Arc<S>,
    f: Arc<F>,
}

impl<S, F> Sequence for Tap<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) + Send + Sync + 'static,
{
    type Item = S::Item;
    type Cursor = TapCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        TapCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            f: Arc::clone(&self.f),
        }
    }
}

/// Cursor of [`Tap`].
pub struct TapCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    f: Arc<F>,
}

#[async_trait]
impl<S, F> Cursor for TapCursor<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) + Send + Sync + 'static,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        let value = self.upstream.pull().await?;
        if let Some(value) = &value {
            (self.f)(value);
        }
        Ok(value)
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.close().await
    }
}

/// Sequence returned by [`TapExt::tap_async`].
pub struct TapAsync<S, F> {
    source: Arc<S>,
    f: Arc<F>,
}

impl<S, F, Fut> Sequence for TapAsync<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    type Item = S::Item;
    type Cursor = TapAsyncCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        TapAsyncCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            f: Arc::clone(&self.f),
        }
    }
}

/// Cursor of [`TapAsync`].
pub struct TapAsyncCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    f: Arc<F>,
}

#[async_trait]
impl<S, F, Fut> Cursor for TapAsyncCursor<S, F>
where
    S: Sequence,
    F: Fn(&S::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        let Some(value) = self.upstream.pull().await? else {
            return Ok(None);
        };

        let effect = (self.f)(&value);
        if let Err(error) = effect.await {
            self.upstream.abort().await;
            return Err(error);
        }
        Ok(Some(value))
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.close().await
    }
}
