// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Switch-map: follow the inner sequence built from the most recent outer value.

use crate::fan_in::{cell, close_cell, pull_cell, Cell, PendingPull};
use async_trait::async_trait;
use futures::future::{select, BoxFuture, Either};
use sluice_core::{close_all, Cursor, Result, Sequence};
use std::sync::Arc;

/// Extension trait providing [`switch_map`](SwitchMapExt::switch_map).
pub trait SwitchMapExt: Sequence + Sized {
    /// Map every value to an inner sequence and yield the values of the latest one.
    ///
    /// # Behavior
    ///
    /// - The outer sequence and the active inner sequence are pulled concurrently
    /// - A new outer value closes the active inner cursor before the next inner
    ///   sequence is opened, so at most one inner cursor is live
    /// - The output completes once the outer sequence and the active inner sequence
    ///   have both completed
    /// - A failure on either side closes the other side, then the failure is returned
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let depth = iter(vec!["BTC"]).switch_map(|symbol| iter(vec![format!("{symbol}:100")]));
    /// assert_eq!(depth.collect().await?, vec!["BTC:100".to_string()]);
    /// # Ok(())
    /// # }
    /// ```
    fn switch_map<F, R>(self, f: F) -> SwitchMap<Self, F>
    where
        F: Fn(Self::Item) -> R + Send + Sync + 'static,
        R: Sequence;
}

impl<S: Sequence> SwitchMapExt for S {
    fn switch_map<F, R>(self, f: F) -> SwitchMap<Self, F>
    where
        F: Fn(Self::Item) -> R + Send + Sync + 'static,
        R: Sequence,
    {
        SwitchMap {
            source: Arc::new(self),
            f: Arc::new(f),
        }
    }
}

/// Sequence returned by [`SwitchMapExt::switch_map`].
pub struct SwitchMap<S, F> {
    source: Arc<S>,
    f: Arc<F>,
}

impl<S, F, R> Sequence for SwitchMap<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> R + Send + Sync + 'static,
    R: Sequence,
{
    type Item = R::Item;
    type Cursor = SwitchMapCursor<S, F, R>;

    fn open(&self) -> Self::Cursor {
        SwitchMapCursor {
            outer: Some(cell(Arc::clone(&self.source))),
            outer_pull: None,
            inner: None,
            inner_pull: None,
            f: Arc::clone(&self.f),
            done: false,
        }
    }
}

enum Event<T, U> {
    Outer(Result<Option<T>>),
    Inner(Result<Option<U>>),
}

/// Cursor of [`SwitchMap`].
pub struct SwitchMapCursor<S: Sequence, F, R: Sequence> {
    // None once the outer sequence completed
    outer: Option<Cell<S>>,
    outer_pull: Option<PendingPull<S::Item>>,
    inner: Option<Cell<R>>,
    inner_pull: Option<PendingPull<R::Item>>,
    f: Arc<F>,
    done: bool,
}

impl<S, F, R> SwitchMapCursor<S, F, R>
where
    S: Sequence,
    R: Sequence,
{
    async fn close_inner(&mut self) -> Result<()> {
        self.inner_pull = None;
        match self.inner.take() {
            Some(inner) => close_cell(&inner).await,
            None => Ok(()),
        }
    }

    async fn close_outer(&mut self) -> Result<()> {
        self.outer_pull = None;
        match self.outer.take() {
            Some(outer) => close_cell(&outer).await,
            None => Ok(()),
        }
    }

    async fn close_both(&mut self) -> Result<()> {
        self.done = true;
        self.outer_pull = None;
        self.inner_pull = None;
        let outer = self.outer.take();
        let inner = self.inner.take();

        let closes: [BoxFuture<'_, Result<()>>; 2] = [
            Box::pin(async move {
                match outer {
                    Some(outer) => close_cell(&outer).await,
                    None => Ok(()),
                }
            }),
            Box::pin(async move {
                match inner {
                    Some(inner) => close_cell(&inner).await,
                    None => Ok(()),
                }
            }),
        ];
        close_all(closes).await
    }
}

#[async_trait]
impl<S, F, R> Cursor for SwitchMapCursor<S, F, R>
where
    S: Sequence,
    F: Fn(S::Item) -> R + Send + Sync + 'static,
    R: Sequence,
{
    type Item = R::Item;

    async fn pull(&mut self) -> Result<Option<R::Item>> {
        loop {
            if self.done {
                return Ok(None);
            }
            if self.outer.is_none() && self.inner.is_none() {
                self.done = true;
                return Ok(None);
            }

            if self.outer_pull.is_none() {
                if let Some(outer) = &self.outer {
                    self.outer_pull = Some(pull_cell(outer));
                }
            }
            if self.inner_pull.is_none() {
                if let Some(inner) = &self.inner {
                    self.inner_pull = Some(pull_cell(inner));
                }
            }

            let event = match (self.outer_pull.as_mut(), self.inner_pull.as_mut()) {
                (Some(outer), Some(inner)) => match select(outer, inner).await {
                    Either::Left((result, _)) => Event::Outer(result),
                    Either::Right((result, _)) => Event::Inner(result),
                },
                (Some(outer), None) => Event::Outer(outer.await),
                (None, Some(inner)) => Event::Inner(inner.await),
                (None, None) => {
                    self.done = true;
                    return Ok(None);
                }
            };

            match event {
                Event::Outer(result) => {
                    self.outer_pull = None;
                    match result {
                        Ok(Some(value)) => {
                            if let Err(error) = self.close_inner().await {
                                if let Err(close_error) = self.close_both().await {
                                    warn!("switch_map: outer close failed: {close_error}");
                                }
                                return Err(error);
                            }
                            let next = (self.f)(value);
                            self.inner = Some(cell(Arc::new(next)));
                        }
                        Ok(None) => self.outer = None,
                        Err(error) => {
                            self.outer = None;
                            self.done = true;
                            if let Err(close_error) = self.close_inner().await {
                                warn!("switch_map: inner cleanup failed: {close_error}");
                            }
                            return Err(error);
                        }
                    }
                }
                Event::Inner(result) => {
                    self.inner_pull = None;
                    match result {
                        Ok(Some(value)) => return Ok(Some(value)),
                        Ok(None) => self.inner = None,
                        Err(error) => {
                            self.inner = None;
                            self.done = true;
                            if let Err(close_error) = self.close_outer().await {
                                warn!("switch_map: outer cleanup failed: {close_error}");
                            }
                            return Err(error);
                        }
                    }
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.done {
            return Ok(());
        }
        self.close_both().await
    }
}
