// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Composable operators over pull-based asynchronous sequences.
//!
//! A sequence is a factory of cursors; a cursor is pulled one value at a time and closed
//! when its consumer is done. Every operator opens its upstream cursors lazily and closes
//! every cursor it opened when its own cursor is closed, so dropping interest at the end
//! of a pipeline always reaches the sockets and subscriptions at its start.
//!
//! This crate re-exports the workspace:
//!
//! - [`sluice_core`]: the cursor protocol, errors, cancellation
//! - [`sluice_sequence`]: sources, transforms, fan-in, fan-out, collectors
//! - [`sluice_sequence_time`]: `throttle` and the timer abstraction
//! - [`sluice_exec`]: `subscribe`, the consuming loop
//!
//! plus [`ReceiverExt`], which turns a tokio channel receiver into a sequence.
//!
//! # Example
//!
//! ```
//! use sluice::prelude::*;
//! use sluice::merge;
//! use tokio::sync::mpsc;
//!
//! # #[tokio::main]
//! # async fn main() -> sluice::Result<()> {
//! let (btc_tx, btc_rx) = mpsc::unbounded_channel();
//! let (eth_tx, eth_rx) = mpsc::unbounded_channel();
//!
//! let feed = merge(vec![btc_rx.into_sequence(), eth_rx.into_sequence()])
//!     .filter(|price: &u64| *price > 100)
//!     .share();
//!
//! btc_tx.send(99).ok();
//! btc_tx.send(101).ok();
//! eth_tx.send(120).ok();
//! drop(btc_tx);
//! drop(eth_tx);
//!
//! let mut prices = feed.collect().await?;
//! prices.sort();
//! assert_eq!(prices, vec![101, 120]);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

pub mod receiver_ext;

pub use receiver_ext::{ReceiverCursor, ReceiverExt, ReceiverSequence};

// Re-export core types
pub use sluice_core::{
    close_all, BoxCursor, BoxSequence, CancellationToken, Cursor, IntoSluiceError, Result,
    ResultExt, Sequence, SluiceError, Upstream,
};

// Re-export operators and free functions
pub use sluice_exec::SubscribeExt;
pub use sluice_sequence::{
    combine_latest, defer, empty, from_stream, hanging, iter, merge, with_cleanup, Borrowed,
    CombinedState, ShareCursor, SharedSequence, Trigger, TriggerErrorPolicy,
};
pub use sluice_sequence_time::{Timer, TokioTimer};

pub use sluice_core;
pub use sluice_exec;
pub use sluice_sequence;
pub use sluice_sequence_time;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::receiver_ext::ReceiverExt;
    pub use sluice_core::{CancellationToken, Cursor, Result, Sequence, SluiceError};
    pub use sluice_exec::SubscribeExt;
    pub use sluice_sequence::prelude::*;
    pub use sluice_sequence_time::prelude::*;
}
