// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension trait providing the `throttle` operator for sequences.
//!
//! Throttle spaces consecutive output values by at least a fixed interval. It is not
//! a leading or trailing debounce: every upstream value is delivered, and the wait for
//! each value is chained onto the slot of the previous one, so a burst is released as
//! a queue of evenly spaced values.
//!
//! - The first value is delivered as soon as it is pulled
//! - Each later value waits until `previous delivery + interval`; a value that arrives
//!   after that point is delivered immediately and starts a new slot
//! - Upstream failures are returned immediately, without waiting for a slot
//! - Closing drops a pending wait and closes the upstream cursor
//!
//! A value whose wait was interrupted by dropping the pull future is kept, and the next
//! pull resumes waiting for the same slot.
//!
//! # Example
//!
//! ```
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::iter;
//! use sluice_sequence_time::prelude::*;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> sluice_core::Result<()> {
//! let start = Instant::now();
//! let orders = iter(vec!["buy", "sell", "buy"]).throttle(Duration::from_secs(1));
//!
//! assert_eq!(orders.collect().await?, vec!["buy", "sell", "buy"]);
//! assert!(start.elapsed() >= Duration::from_secs(2));
//! # Ok(())
//! # }
//! ```

use crate::timer::{Timer, TokioTimer};
use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence, Upstream};
use std::sync::Arc;
use std::time::Duration;

/// Extension trait providing [`throttle`](ThrottleExt::throttle).
pub trait ThrottleExt: Sequence + Sized {
    /// Space consecutive values by at least `interval`, using [`TokioTimer`].
    fn throttle(self, interval: Duration) -> Throttle<Self, TokioTimer> {
        self.throttle_with_timer(interval, TokioTimer)
    }

    /// Space consecutive values by at least `interval`, measured with `timer`.
    fn throttle_with_timer<T: Timer>(self, interval: Duration, timer: T) -> Throttle<Self, T>;
}

impl<S: Sequence> ThrottleExt for S {
    fn throttle_with_timer<T: Timer>(self, interval: Duration, timer: T) -> Throttle<Self, T> {
        Throttle {
            source: Arc::new(self),
            interval,
            timer,
        }
    }
}

/// Sequence returned by [`ThrottleExt::throttle`].
pub struct Throttle<S, T> {
    source: Arc<S>,
    interval: Duration,
    timer: T,
}

impl<S: Sequence, T: Timer> Sequence for Throttle<S, T> {
    type Item = S::Item;
    type Cursor = ThrottleCursor<S, T>;

    fn open(&self) -> Self::Cursor {
        ThrottleCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            interval: self.interval,
            timer: self.timer.clone(),
            last_delivery: None,
            held: None,
        }
    }
}

/// Cursor of [`Throttle`].
pub struct ThrottleCursor<S: Sequence, T: Timer> {
    upstream: Upstream<S>,
    interval: Duration,
    timer: T,
    last_delivery: Option<T::Instant>,
    // Pulled value and the slot it is waiting for
    held: Option<(S::Item, T::Instant)>,
}

impl<S: Sequence, T: Timer> ThrottleCursor<S, T> {
    fn slot(&self) -> T::Instant {
        let now = self.timer.now();
        match self.last_delivery {
            Some(last) => (last + self.interval).max(now),
            None => now,
        }
    }
}

#[async_trait]
impl<S: Sequence, T: Timer> Cursor for ThrottleCursor<S, T> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.held.is_none() {
            let Some(value) = self.upstream.pull().await? else {
                return Ok(None);
            };
            let slot = self.slot();
            self.held = Some((value, slot));
        }

        let Some(slot) = self.held.as_ref().map(|(_, slot)| *slot) else {
            return Ok(None);
        };
        let now = self.timer.now();
        if slot > now {
            self.timer.sleep_future(slot - now).await;
        }

        self.last_delivery = Some(self.timer.now());
        Ok(self.held.take().map(|(value, _)| value))
    }

    async fn close(&mut self) -> Result<()> {
        if self.held.take().is_some() {
            debug!("throttle: closed while a value was waiting for its slot");
        }
        self.upstream.close().await
    }
}
