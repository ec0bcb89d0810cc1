// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Value transforms: [`map`](MapExt::map), [`try_map`](MapExt::try_map) and
//! [`map_async`](MapExt::map_async).
//!
//! A failing transform is treated exactly like a failing upstream: the upstream cursor
//! is closed and the error is returned from the pull that triggered it. The cursor is
//! finished afterwards.
//!
//! # Example
//!
//! ```
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::iter;
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let cents = iter(vec![1.25_f64, 3.5]).map(|price| (price * 100.0) as u64);
//! assert_eq!(cents.collect().await?, vec![125, 350]);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::future::Future;
use std::sync::Arc;

/// Extension trait providing the value transforms.
pub trait MapExt: Sequence + Sized {
    /// Transform every value with an infallible function.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> U + Send + Sync + 'static,
        U: Send + 'static;

    /// Transform every value with a fallible function.
    ///
    /// An `Err` ends the sequence: the upstream is closed and the error is returned.
    fn try_map<U, F>(self, f: F) -> TryMap<Self, F>
    where
        F: Fn(Self::Item) -> Result<U> + Send + Sync + 'static,
        U: Send + 'static;

    /// Transform every value with an asynchronous, fallible function.
    ///
    /// The future returned by `f` is awaited before the value is yielded.
    fn map_async<U, F, Fut>(self, f: F) -> MapAsync<Self, F>
    where
        F: Fn(Self::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U>> + Send + 'static,
        U: Send + 'static;
}

impl<S: Sequence> MapExt for S {
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        Map {
            source: Arc::new(self),
            f: Arc::new(f),
        }
    }

    fn try_map<U, F>(self, f: F) -> TryMap<Self, F>
    where
        F: Fn(Self::Item) -> Result<U> + Send + Sync + 'static,
        U: Send + 'static,
    {
        TryMap {
            source: Arc::new(self),
            f: Arc::new(f),
        }
    }

    fn map_async<U, F, Fut>(self, f: F) -> MapAsync<Self, F>
    where
        F: Fn(Self::Item) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<U>> + Send + 'static,
        U: Send + 'static,
    {
        MapAsync {
            source: Arc::new(self),
            f: Arc::new(f),
        }
    }
}

/// Sequence returned by [`MapExt::map`].
pub struct Map<S, F> {
    source: Arc<S>,
    f: Arc<F>,
}

impl<S, F, U> Sequence for Map<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> U + Send + Sync + 'static,
    U: Send + 'static,
{
    type Item = U;
    type Cursor = MapCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        MapCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            f: Arc::clone(&self.f),
        }
    }
}

/// Cursor of [`Map`].
pub struct MapCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    f: Arc<F>,
}

#[async_trait]
impl<S, F, U> Cursor for MapCursor<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> U + Send + Sync + 'static,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<U>> {
        Ok(self.upstream.pull().await?.map(|value| (self.f)(value)))
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.close().await
    }
}

/// Sequence returned by [`MapExt::try_map`].
pub struct TryMap<S, F> {
    source: Arc<S>,
    f: Arc<F>,
}

impl<S, F, U> Sequence for TryMap<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> Result<U> + Send + Sync + 'static,
    U: Send + 'static,
{
    type Item = U;
    type Cursor = TryMapCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        TryMapCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            f: Arc::clone(&self.f),
        }
    }
}

/// Cursor of [`TryMap`].
pub struct TryMapCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    f: Arc<F>,
}

#[async_trait]
impl<S, F, U> Cursor for TryMapCursor<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> Result<U> + Send + Sync + 'static,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<U>> {
        let Some(value) = self.upstream.pull().await? else {
            return Ok(None);
        };

        match (self.f)(value) {
            Ok(mapped) => Ok(Some(mapped)),
            Err(error) => {
                self.upstream.abort().await;
                Err(error)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.close().await
    }
}

/// Sequence returned by [`MapExt::map_async`].
pub struct MapAsync<S, F> {
    source: Arc<S>,
    f: Arc<F>,
}

impl<S, F, Fut, U> Sequence for MapAsync<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<U>> + Send + 'static,
    U: Send + 'static,
{
    type Item = U;
    type Cursor = MapAsyncCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        MapAsyncCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            f: Arc::clone(&self.f),
        }
    }
}

/// Cursor of [`MapAsync`].
pub struct MapAsyncCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    f: Arc<F>,
}

#[async_trait]
impl<S, F, Fut, U> Cursor for MapAsyncCursor<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<U>> + Send + 'static,
    U: Send + 'static,
{
    type Item = U;

    async fn pull(&mut self) -> Result<Option<U>> {
        let Some(value) = self.upstream.pull().await? else {
            return Ok(None);
        };

        match (self.f)(value).await {
            Ok(mapped) => Ok(Some(mapped)),
            Err(error) => {
                self.upstream.abort().await;
                Err(error)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.close().await
    }
}
