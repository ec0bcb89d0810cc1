// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Composable operators over pull-based asynchronous sequences.
//!
//! Every operator is a [`Sequence`](sluice_core::Sequence) built from one or more
//! source sequences. Nothing runs until a cursor is opened and pulled; each operator
//! cursor opens its upstream cursors lazily and closes every one it opened when it is
//! closed, so early termination always propagates to the sources.
//!
//! | Group | Operators |
//! |-------|-----------|
//! | Sources | [`iter`], [`from_stream`], [`empty`], [`hanging`], [`defer`] |
//! | Transforms | `map`, `try_map`, `map_async`, `filter`, `tap`, `tap_async`, `pairwise`, `start_with`, `append` |
//! | Lifecycle | `take`, `take_until`, `cycle`, `catch`, `finally`, [`with_cleanup`] |
//! | Fan-in | [`merge`], [`combine_latest`], `switch_map` |
//! | Fan-out | `share` |
//! | Collectors | `collect`, `take_first`, `into_stream` |
//!
//! Time-based operators such as `throttle` live in `sluice-sequence-time`.
//!
//! # Example
//!
//! ```
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::{iter, merge};
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let bids = iter(vec![99, 101, 98]);
//! let asks = iter(vec![102, 103]);
//!
//! let mut book = merge(vec![bids, asks])
//!     .filter(|price| *price > 100)
//!     .take(3)
//!     .collect()
//!     .await?;
//!
//! book.sort();
//! assert_eq!(book, vec![101, 102, 103]);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
mod fan_in;

pub mod append;
pub mod catch;
pub mod cleanup;
pub mod collect;
pub mod combine_latest;
pub mod cycle;
pub mod defer;
pub mod filter;
pub mod finally;
pub mod map;
pub mod merge;
pub mod pairwise;
pub mod prelude;
pub mod sentinel;
pub mod share;
pub mod source;
pub mod start_with;
pub mod switch_map;
pub mod take;
pub mod take_until;
pub mod tap;

pub use self::append::AppendExt;
pub use self::catch::CatchExt;
pub use self::cleanup::{with_cleanup, Borrowed};
pub use self::collect::CollectExt;
pub use self::combine_latest::{combine_latest, CombineLatestExt, CombinedState};
pub use self::cycle::CycleExt;
pub use self::defer::defer;
pub use self::filter::FilterExt;
pub use self::finally::FinallyExt;
pub use self::map::MapExt;
pub use self::merge::{merge, MergeExt};
pub use self::pairwise::PairwiseExt;
pub use self::sentinel::{empty, hanging};
pub use self::share::{ShareCursor, ShareExt, SharedSequence};
pub use self::source::{from_stream, iter, IntoStreamExt};
pub use self::start_with::StartWithExt;
pub use self::switch_map::SwitchMapExt;
pub use self::take::TakeExt;
pub use self::take_until::{TakeUntilExt, Trigger, TriggerErrorPolicy};
pub use self::tap::TapExt;
