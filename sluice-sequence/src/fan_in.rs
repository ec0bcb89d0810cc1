// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared machinery for operators that pull from several upstreams at once.
//!
//! Each upstream lives in its own cell so that a pull can be in flight on every source
//! simultaneously while the stage still holds a handle to close it. In-flight pulls are
//! driven by a [`FuturesUnordered`], so events come out in completion order.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use sluice_core::{close_all, Result, Sequence, SluiceError, Upstream};
use std::mem;
use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) type Cell<S> = Arc<Mutex<Upstream<S>>>;

pub(crate) type PendingPull<T> = BoxFuture<'static, Result<Option<T>>>;

type IndexedPull<T> = BoxFuture<'static, (usize, Result<Option<T>>)>;

pub(crate) fn cell<S: Sequence>(source: Arc<S>) -> Cell<S> {
    Arc::new(Mutex::new(Upstream::new(source)))
}

/// Start a pull on a cell. The lock is held for as long as the pull is in flight.
pub(crate) fn pull_cell<S: Sequence>(cell: &Cell<S>) -> PendingPull<S::Item> {
    let cell = Arc::clone(cell);
    async move { cell.lock().await.pull().await }.boxed()
}

pub(crate) async fn close_cell<S: Sequence>(cell: &Cell<S>) -> Result<()> {
    cell.lock().await.close().await
}

/// A set of upstreams pulled concurrently.
pub(crate) struct FanIn<S: Sequence> {
    // None once the source completed, failed or was closed
    slots: Vec<Option<Cell<S>>>,
    pending: FuturesUnordered<IndexedPull<S::Item>>,
    started: bool,
    closed: bool,
}

impl<S: Sequence> FanIn<S> {
    pub(crate) fn new(sources: &[Arc<S>]) -> Self {
        Self {
            slots: sources
                .iter()
                .map(|source| Some(cell(Arc::clone(source))))
                .collect(),
            pending: FuturesUnordered::new(),
            started: false,
            closed: false,
        }
    }

    /// Wait for the next pull to settle, opening and arming every source on first use.
    ///
    /// Returns `None` once no source is active any more.
    pub(crate) async fn next(&mut self) -> Option<(usize, Result<Option<S::Item>>)> {
        if self.closed {
            return None;
        }
        if !self.started {
            self.started = true;
            // Every source is open before any pull settles, so teardown reaches all of them
            for cell in self.slots.iter().flatten() {
                if let Ok(mut upstream) = cell.try_lock() {
                    upstream.open();
                }
            }
            for index in 0..self.slots.len() {
                self.arm(index);
            }
        }
        self.pending.next().await
    }

    /// Start the next pull on source `index` after it delivered a value.
    pub(crate) fn arm(&mut self, index: usize) {
        if let Some(Some(cell)) = self.slots.get(index) {
            let pull = pull_cell(cell);
            self.pending.push(async move { (index, pull.await) }.boxed());
        }
    }

    /// Drop source `index` from the active set after it completed.
    pub(crate) fn retire(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    /// Handle a failure of source `index`: close every other source and hand back the
    /// error to return to the consumer.
    pub(crate) async fn fail(&mut self, index: usize, error: SluiceError) -> SluiceError {
        // The failed source closed itself
        self.retire(index);
        if let Err(close_error) = self.close().await {
            warn!("fan-in cleanup after upstream failure: {close_error}");
        }
        error
    }

    /// Close every source that is still open, concurrently.
    pub(crate) async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        // In-flight pulls hold their cell's lock
        drop(mem::take(&mut self.pending));

        let cells: Vec<Cell<S>> = self.slots.iter_mut().filter_map(Option::take).collect();
        close_all(cells.iter().map(close_cell)).await
    }
}
