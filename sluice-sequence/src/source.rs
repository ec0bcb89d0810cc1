// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adapters between sequences and the `futures` ecosystem.
//!
//! - [`iter`] replays a cloneable collection or iterator on every cursor.
//! - [`from_stream`] wraps a stream producer such as a socket reader or a pub/sub
//!   subscription. The factory is called once per cursor, so every cursor owns its own
//!   stream, and closing the cursor drops it.
//! - [`IntoStreamExt::into_stream`] drives a sequence as a [`Stream`] for consumers that
//!   expect one.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use sluice_core::{Cursor, Result, Sequence};
use std::sync::Arc;

/// A sequence yielding the values of `values`, replayed from the start by every cursor.
///
/// # Examples
///
/// ```
/// use sluice_sequence::prelude::*;
/// use sluice_sequence::iter;
///
/// # #[tokio::main]
/// # async fn main() -> sluice_core::Result<()> {
/// let symbols = iter(vec!["AAPL", "MSFT"]);
/// assert_eq!(symbols.collect().await?, vec!["AAPL", "MSFT"]);
/// assert_eq!(symbols.collect().await?, vec!["AAPL", "MSFT"]);
/// # Ok(())
/// # }
/// ```
pub fn iter<I>(values: I) -> Iter<I>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    Iter { values }
}

/// Sequence returned by [`iter`].
#[derive(Clone, Debug)]
pub struct Iter<I> {
    values: I,
}

impl<I> Sequence for Iter<I>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    type Item = I::Item;
    type Cursor = IterCursor<I::IntoIter>;

    fn open(&self) -> Self::Cursor {
        IterCursor {
            remaining: Some(self.values.clone().into_iter()),
        }
    }
}

/// Cursor of [`Iter`].
pub struct IterCursor<It> {
    remaining: Option<It>,
}

#[async_trait]
impl<It> Cursor for IterCursor<It>
where
    It: Iterator + Send + 'static,
    It::Item: Send + 'static,
{
    type Item = It::Item;

    async fn pull(&mut self) -> Result<Option<It::Item>> {
        let next = self.remaining.as_mut().and_then(Iterator::next);
        if next.is_none() {
            self.remaining = None;
        }
        Ok(next)
    }

    async fn close(&mut self) -> Result<()> {
        self.remaining = None;
        Ok(())
    }
}

/// A sequence backed by a stream of results, one stream per cursor.
///
/// An `Err` item ends the cursor with that error and drops the stream.
///
/// # Examples
///
/// ```
/// use futures::stream;
/// use sluice_sequence::prelude::*;
/// use sluice_sequence::from_stream;
///
/// # #[tokio::main]
/// # async fn main() -> sluice_core::Result<()> {
/// let frames = from_stream(|| stream::iter(vec![Ok("ping"), Ok("pong")]));
/// assert_eq!(frames.collect().await?, vec!["ping", "pong"]);
/// # Ok(())
/// # }
/// ```
pub fn from_stream<F, St, T>(factory: F) -> FromStream<F>
where
    F: Fn() -> St + Send + Sync + 'static,
    St: Stream<Item = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    FromStream {
        factory: Arc::new(factory),
    }
}

/// Sequence returned by [`from_stream`].
pub struct FromStream<F> {
    factory: Arc<F>,
}

impl<F, St, T> Sequence for FromStream<F>
where
    F: Fn() -> St + Send + Sync + 'static,
    St: Stream<Item = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    type Item = T;
    type Cursor = FromStreamCursor<F, T>;

    fn open(&self) -> Self::Cursor {
        FromStreamCursor {
            factory: Some(Arc::clone(&self.factory)),
            stream: None,
        }
    }
}

/// Cursor of [`FromStream`].
pub struct FromStreamCursor<F, T> {
    // Taken on the first pull
    factory: Option<Arc<F>>,
    stream: Option<BoxStream<'static, Result<T>>>,
}

#[async_trait]
impl<F, St, T> Cursor for FromStreamCursor<F, T>
where
    F: Fn() -> St + Send + Sync + 'static,
    St: Stream<Item = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    type Item = T;

    async fn pull(&mut self) -> Result<Option<T>> {
        if let Some(factory) = self.factory.take() {
            self.stream = Some(factory().boxed());
        }
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        match stream.next().await {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(error)) => {
                self.stream = None;
                Err(error)
            }
            None => {
                self.stream = None;
                Ok(None)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.factory = None;
        self.stream = None;
        Ok(())
    }
}

/// Drive a sequence as a [`Stream`] of results.
pub trait IntoStreamExt: Sequence + Sized {
    /// Open a cursor and expose it as a stream.
    ///
    /// The stream ends after the first error.
    ///
    /// # Cleanup
    ///
    /// The stream owns the cursor but has no way to close it. Dropping the stream
    /// before it ends drops the cursor unclosed, and any upstream cleanup is skipped,
    /// as with dropping a [`Cursor`](sluice_core::Cursor). Drain the stream to its end,
    /// or open a cursor and [`close`](sluice_core::Cursor::close) it yourself, when
    /// the source holds resources.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::StreamExt;
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let values: Vec<_> = iter(vec![1, 2]).into_stream().collect().await;
    /// assert_eq!(values.len(), 2);
    /// # }
    /// ```
    fn into_stream(self) -> BoxStream<'static, Result<Self::Item>>;
}

impl<S: Sequence> IntoStreamExt for S {
    fn into_stream(self) -> BoxStream<'static, Result<Self::Item>> {
        stream::unfold(Some(self.open()), |state| async move {
            let mut cursor = state?;
            match cursor.pull().await {
                Ok(Some(value)) => Some((Ok(value), Some(cursor))),
                Ok(None) => None,
                Err(error) => Some((Err(error), None)),
            }
        })
        .boxed()
    }
}
