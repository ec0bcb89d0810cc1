// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cleanup patcher for user-defined transforms.
//!
//! [`with_cleanup`] wraps a transform `source -> output` so that the output cursor owns
//! exactly one source cursor, whatever the transform does with its input. The transform
//! receives a [`Borrowed`] handle instead of the source itself: every cursor it opens on
//! that handle pulls from the same single source cursor. When the output cursor is
//! closed, the source cursor is closed too, even if the transform stopped pulling early.
//!
//! # Example
//!
//! ```
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::{iter, with_cleanup};
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let evens_doubled = with_cleanup(iter(1..=6), |input| {
//!     input.filter(|v: &i32| v % 2 == 0).map(|v| v * 2)
//! });
//!
//! assert_eq!(evens_doubled.collect().await?, vec![4, 8, 12]);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use futures::future::BoxFuture;
use sluice_core::{close_all, Cursor, Result, Sequence, Upstream};
use std::sync::Arc;
use tokio::sync::Mutex;

type SharedUpstream<S> = Arc<Mutex<Upstream<S>>>;

/// Wrap `transform` so that closing its output always closes the source.
///
/// See the [module-level documentation](crate::cleanup) for details.
pub fn with_cleanup<S, F, O>(source: S, transform: F) -> WithCleanup<S, F>
where
    S: Sequence,
    F: Fn(Borrowed<S>) -> O + Send + Sync + 'static,
    O: Sequence,
{
    WithCleanup {
        source: Arc::new(source),
        transform: Arc::new(transform),
    }
}

/// Sequence returned by [`with_cleanup`].
pub struct WithCleanup<S, F> {
    source: Arc<S>,
    transform: Arc<F>,
}

impl<S, F, O> Sequence for WithCleanup<S, F>
where
    S: Sequence,
    F: Fn(Borrowed<S>) -> O + Send + Sync + 'static,
    O: Sequence,
{
    type Item = O::Item;
    type Cursor = WithCleanupCursor<S, O::Cursor>;

    fn open(&self) -> Self::Cursor {
        let upstream = Arc::new(Mutex::new(Upstream::new(Arc::clone(&self.source))));
        let output = (self.transform)(Borrowed {
            upstream: Arc::clone(&upstream),
        });

        WithCleanupCursor {
            upstream,
            inner: output.open(),
            closed: false,
        }
    }
}

/// Cursor of [`WithCleanup`].
pub struct WithCleanupCursor<S: Sequence, C> {
    upstream: SharedUpstream<S>,
    inner: C,
    closed: bool,
}

#[async_trait]
impl<S, C> Cursor for WithCleanupCursor<S, C>
where
    S: Sequence,
    C: Cursor,
{
    type Item = C::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.closed {
            return Ok(None);
        }

        match self.inner.pull().await {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => {
                self.closed = true;
                self.upstream.lock().await.close().await?;
                Ok(None)
            }
            Err(error) => {
                self.closed = true;
                self.upstream.lock().await.abort().await;
                Err(error)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let upstream = &self.upstream;
        let closes: [BoxFuture<'_, Result<()>>; 2] = [
            self.inner.close(),
            Box::pin(async move { upstream.lock().await.close().await }),
        ];
        close_all(closes).await
    }
}

/// The source as seen from inside a [`with_cleanup`] transform.
///
/// Every cursor opened on this handle shares the single source cursor owned by the
/// enclosing output cursor.
pub struct Borrowed<S: Sequence> {
    upstream: SharedUpstream<S>,
}

impl<S: Sequence> Clone for Borrowed<S> {
    fn clone(&self) -> Self {
        Self {
            upstream: Arc::clone(&self.upstream),
        }
    }
}

impl<S: Sequence> Sequence for Borrowed<S> {
    type Item = S::Item;
    type Cursor = BorrowedCursor<S>;

    fn open(&self) -> Self::Cursor {
        BorrowedCursor {
            upstream: Arc::clone(&self.upstream),
        }
    }
}

/// Cursor of [`Borrowed`].
pub struct BorrowedCursor<S: Sequence> {
    upstream: SharedUpstream<S>,
}

#[async_trait]
impl<S: Sequence> Cursor for BorrowedCursor<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        self.upstream.lock().await.pull().await
    }

    async fn close(&mut self) -> Result<()> {
        self.upstream.lock().await.close().await
    }
}
