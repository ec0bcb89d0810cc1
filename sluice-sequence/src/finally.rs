// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Finally operator that runs a callback when a cursor terminates.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;

/// Extension trait providing [`finally`](FinallyExt::finally).
pub trait FinallyExt: Sequence + Sized {
    /// Run `callback` once when a cursor that has started pulling terminates.
    ///
    /// Termination is completion, failure or close, whichever comes first. On close,
    /// the callback runs after the upstream has been closed. A cursor that is closed
    /// before its first pull never started and does not run the callback.
    fn finally<F>(self, callback: F) -> Finally<Self, F>
    where
        F: Fn() + Send + Sync + 'static;
}

impl<S: Sequence> FinallyExt for S {
    fn finally<F>(self, callback: F) -> Finally<Self, F>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Finally {
            source: Arc::new(self),
            callback: Arc::new(callback),
        }
    }
}

/// Sequence returned by [`FinallyExt::finally`].
pub struct Finally<S, F> {
    source: Arc<S>,
    callback: Arc<F>,
}

impl<S, F> Sequence for Finally<S, F>
where
    S: Sequence,
    F: Fn() + Send + Sync + 'static,
{
    type Item = S::Item;
    type Cursor = FinallyCursor<S, F>;

    fn open(&self) -> Self::Cursor {
        FinallyCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            callback: Arc::clone(&self.callback),
            started: false,
            ran: false,
        }
    }
}

/// Cursor of [`Finally`].
pub struct FinallyCursor<S: Sequence, F> {
    upstream: Upstream<S>,
    callback: Arc<F>,
    started: bool,
    ran: bool,
}

impl<S: Sequence, F: Fn()> FinallyCursor<S, F> {
    fn run_once(&mut self) {
        if self.started && !self.ran {
            self.ran = true;
            (self.callback)();
        }
    }
}

#[async_trait]
impl<S, F> Cursor for FinallyCursor<S, F>
where
    S: Sequence,
    F: Fn() + Send + Sync + 'static,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.ran {
            return Ok(None);
        }
        self.started = true;

        let result = self.upstream.pull().await;
        if !matches!(result, Ok(Some(_))) {
            self.run_once();
        }
        result
    }

    async fn close(&mut self) -> Result<()> {
        let result = self.upstream.close().await;
        self.run_once();
        result
    }
}
