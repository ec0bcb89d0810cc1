// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Instrumentation for cleanup assertions.
//!
//! A [`Probe`] forwards everything to the wrapped sequence and records, in a shared
//! [`ProbeStats`], how many cursors were opened, how many pulls and closes reached the
//! source and how many cursors were live at the same time. A cursor is live from its
//! first pull until it completes, fails or its close has finished.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    pulls: AtomicUsize,
    values: AtomicUsize,
    closes: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

/// Shared view of the counters recorded by a [`Probe`].
#[derive(Clone, Debug, Default)]
pub struct ProbeStats {
    counters: Arc<Counters>,
}

impl ProbeStats {
    /// Cursors opened on the source.
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Pulls that reached the source.
    pub fn pulls(&self) -> usize {
        self.counters.pulls.load(Ordering::SeqCst)
    }

    /// Values the source produced.
    pub fn values(&self) -> usize {
        self.counters.values.load(Ordering::SeqCst)
    }

    /// Close calls that reached the source, including repeated ones.
    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    /// Cursors currently live.
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Largest number of cursors that were live at the same time.
    pub fn max_live(&self) -> usize {
        self.counters.max_live.load(Ordering::SeqCst)
    }

    fn start(&self) {
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);
    }

    fn end(&self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wrap `source` so that its cursors are counted.
pub fn probe<S: Sequence>(source: S) -> (Probe<S>, ProbeStats) {
    probe_with_close_delay(source, Duration::ZERO)
}

/// Like [`probe`], but every close of a live cursor takes `delay` to complete.
///
/// Useful to observe operators that must wait for a teardown before reopening.
pub fn probe_with_close_delay<S: Sequence>(source: S, delay: Duration) -> (Probe<S>, ProbeStats) {
    let stats = ProbeStats::default();
    (
        Probe {
            source,
            stats: stats.clone(),
            close_delay: delay,
        },
        stats,
    )
}

/// Sequence returned by [`probe`].
pub struct Probe<S> {
    source: S,
    stats: ProbeStats,
    close_delay: Duration,
}

impl<S: Sequence> Sequence for Probe<S> {
    type Item = S::Item;
    type Cursor = ProbeCursor<S::Cursor>;

    fn open(&self) -> Self::Cursor {
        self.stats.counters.opens.fetch_add(1, Ordering::SeqCst);
        ProbeCursor {
            inner: self.source.open(),
            stats: self.stats.clone(),
            close_delay: self.close_delay,
            live: false,
            ended: false,
        }
    }
}

/// Cursor of a [`Probe`].
pub struct ProbeCursor<C> {
    inner: C,
    stats: ProbeStats,
    close_delay: Duration,
    live: bool,
    ended: bool,
}

impl<C> ProbeCursor<C> {
    fn end(&mut self) {
        self.ended = true;
        if self.live {
            self.live = false;
            self.stats.end();
        }
    }
}

#[async_trait]
impl<C: Cursor> Cursor for ProbeCursor<C> {
    type Item = C::Item;

    async fn pull(&mut self) -> Result<Option<C::Item>> {
        self.stats.counters.pulls.fetch_add(1, Ordering::SeqCst);
        if !self.live && !self.ended {
            self.live = true;
            self.stats.start();
        }

        let result = self.inner.pull().await;
        match &result {
            Ok(Some(_)) => {
                self.stats.counters.values.fetch_add(1, Ordering::SeqCst);
            }
            Ok(None) | Err(_) => self.end(),
        }
        result
    }

    async fn close(&mut self) -> Result<()> {
        self.stats.counters.closes.fetch_add(1, Ordering::SeqCst);
        if self.live && !self.close_delay.is_zero() {
            tokio::time::sleep(self.close_delay).await;
        }
        let result = self.inner.close().await;
        self.end();
        result
    }
}
