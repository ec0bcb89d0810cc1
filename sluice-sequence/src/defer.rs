// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Lazy construction of a sequence on first pull.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::{Arc, OnceLock};

/// Defer building a sequence until a cursor first pulls from it.
///
/// The factory runs at most once per [`Defer`] value, on the first pull of any of its
/// cursors; every cursor opened afterwards reuses the constructed sequence. Opening or
/// closing a cursor that was never pulled does not run the factory.
///
/// # Examples
///
/// ```
/// use sluice_sequence::prelude::*;
/// use sluice_sequence::{defer, iter};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> sluice_core::Result<()> {
/// let builds = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&builds);
/// let quotes = defer(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
///     iter(vec![1.01, 1.02])
/// });
///
/// assert_eq!(builds.load(Ordering::SeqCst), 0);
/// assert_eq!(quotes.collect().await?, vec![1.01, 1.02]);
/// assert_eq!(quotes.collect().await?, vec![1.01, 1.02]);
/// assert_eq!(builds.load(Ordering::SeqCst), 1);
/// # Ok(())
/// # }
/// ```
pub fn defer<F, S>(factory: F) -> Defer<F, S>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Sequence,
{
    Defer {
        inner: Arc::new(Deferred {
            factory,
            built: OnceLock::new(),
        }),
    }
}

struct Deferred<F, S> {
    factory: F,
    built: OnceLock<Arc<S>>,
}

impl<F, S> Deferred<F, S>
where
    F: Fn() -> S,
{
    fn source(&self) -> Arc<S> {
        Arc::clone(self.built.get_or_init(|| Arc::new((self.factory)())))
    }
}

/// Sequence returned by [`defer`].
pub struct Defer<F, S> {
    inner: Arc<Deferred<F, S>>,
}

impl<F, S> Sequence for Defer<F, S>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Sequence,
{
    type Item = S::Item;
    type Cursor = DeferCursor<F, S>;

    fn open(&self) -> Self::Cursor {
        DeferCursor {
            inner: Arc::clone(&self.inner),
            upstream: None,
            closed: false,
        }
    }
}

/// Cursor of [`Defer`].
pub struct DeferCursor<F, S: Sequence> {
    inner: Arc<Deferred<F, S>>,
    upstream: Option<Upstream<S>>,
    closed: bool,
}

#[async_trait]
impl<F, S> Cursor for DeferCursor<F, S>
where
    F: Fn() -> S + Send + Sync + 'static,
    S: Sequence,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.closed {
            return Ok(None);
        }
        let inner = &self.inner;
        self.upstream
            .get_or_insert_with(|| Upstream::new(inner.source()))
            .pull()
            .await
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        match self.upstream.as_mut() {
            Some(upstream) => upstream.close().await,
            None => Ok(()),
        }
    }
}
