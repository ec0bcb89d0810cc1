// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core protocol for pull-based asynchronous sequences.
//!
//! A [`Sequence`] is a factory of [`Cursor`]s. A cursor is pulled one value at a time and
//! closed when its consumer is done with it. Operators in `sluice-sequence` are stages
//! that own one or more upstream cursors and expose a single downstream cursor.
//!
//! This crate holds the pieces every stage shares:
//!
//! - [`Cursor`], [`Sequence`] and their boxed forms
//! - [`Upstream`], which owns a single source cursor and enforces the cleanup rules
//! - [`close_all`], the collect-all join used when several upstreams close together
//! - [`SluiceError`] and the [`Result`] alias
//! - [`CancellationToken`], the out-of-band close signal

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod cancellation_token;
pub mod cursor;
pub mod error;
pub mod join;
pub mod sequence;
pub mod upstream;

pub use self::cancellation_token::{CancellationToken, Cancelled};
pub use self::cursor::{BoxCursor, Cursor};
pub use self::error::{IntoSluiceError, Result, ResultExt, SluiceError};
pub use self::join::close_all;
pub use self::sequence::{BoxSequence, Sequence};
pub use self::upstream::Upstream;
