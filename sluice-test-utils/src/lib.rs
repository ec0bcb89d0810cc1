// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the sluice sequence operators.
//!
//! This crate provides controllable sources, instrumentation and assertion helpers for
//! testing operators. It is designed for use in development and testing only, not for
//! production code.
//!
//! # Key Types
//!
//! ## `test_channel`
//!
//! A sequence fed imperatively from the test body. The sender stays with the test and
//! the sequence is handed to the operator under test:
//!
//! ```rust
//! use sluice_core::{Cursor, Sequence};
//! use sluice_test_utils::test_channel;
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let (tx, prices) = test_channel();
//! let mut cursor = prices.open();
//!
//! tx.send(101)?;
//! assert_eq!(cursor.pull().await?, Some(101));
//! # Ok(())
//! # }
//! ```
//!
//! ## `probe`
//!
//! Wraps any sequence and counts what operators do to it, so cleanup guarantees can be
//! asserted directly:
//!
//! ```rust
//! use sluice_core::{Cursor, Sequence};
//! use sluice_test_utils::{counter, probe};
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let (source, stats) = probe(counter());
//! let mut cursor = source.open();
//!
//! cursor.pull().await?;
//! cursor.close().await?;
//!
//! assert_eq!(stats.opens(), 1);
//! assert_eq!(stats.closes(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `channel` - channel-backed sequences driven by the test
//! - `probe` - open/pull/close instrumentation
//! - `error_injection` - sequences that fail on pull or on close
//! - `sources` - counting and delayed sources
//! - `helpers` - assertion and pull helpers with timeouts
//! - `test_data` - market-data fixtures

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod channel;
pub mod error_injection;
pub mod helpers;
pub mod probe;
pub mod sources;
pub mod test_data;

pub use channel::{test_channel, ChannelCursor, ChannelSequence, TestSender};
pub use error_injection::{CloseFailingSequence, ErrorInjectingSequence};
pub use helpers::{assert_completed, assert_no_element_emitted, unwrap_pull};
pub use probe::{probe, probe_with_close_delay, Probe, ProbeStats};
pub use sources::{counter, delayed, Counter, Delayed};
pub use test_data::{tick_btc, tick_eth, tick_sol, PriceTick};
