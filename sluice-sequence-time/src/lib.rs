// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Time-based operators for sluice sequences.
//!
//! Operators here never read the clock or sleep directly; they go through the
//! [`Timer`] trait so the runtime can be swapped. [`TokioTimer`] is the provided
//! implementation and follows tokio's clock, which makes the operators testable with a
//! paused runtime.
//!
//! # Overview
//!
//! - **`Timer` trait** - sleep futures and monotonic instants
//! - **`TokioTimer`** - the tokio implementation
//! - **`ThrottleExt`** - `.throttle(interval)` and `.throttle_with_timer(interval, timer)`
//!
//! # Example
//!
//! ```
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::iter;
//! use sluice_sequence_time::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> sluice_core::Result<()> {
//! let quotes = iter(vec![100, 101, 102]).throttle(Duration::from_millis(250));
//! assert_eq!(quotes.collect().await?, vec![100, 101, 102]);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;

pub mod prelude;
pub mod throttle;
pub mod timer;

pub use self::throttle::{Throttle, ThrottleCursor, ThrottleExt};
pub use self::timer::{Timer, TokioTimer};
