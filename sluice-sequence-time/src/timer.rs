// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime timer abstraction used by the time-based operators.

use std::fmt::Debug;
use std::future::Future;
use std::ops::{Add, Sub};
use std::time::Duration;

pub trait Timer: Clone + Send + Sync + Debug + 'static {
    type Sleep: Future<Output = ()> + Send;

    type Instant: Copy
        + Debug
        + Ord
        + Send
        + Sync
        + Add<Duration, Output = Self::Instant>
        + Sub<Self::Instant, Output = Duration>;

    /// Creates a future that completes once `duration` has elapsed.
    fn sleep_future(&self, duration: Duration) -> Self::Sleep;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;
}

/// [`Timer`] backed by tokio's clock.
///
/// Uses `tokio::time::Instant`, so a runtime started with a paused clock drives it
/// deterministically.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    type Instant = tokio::time::Instant;

    fn sleep_future(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }
}
