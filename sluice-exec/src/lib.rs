// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Terminal sinks for sluice sequences.
//!
//! Where the collectors in `sluice-sequence` gather values into memory, the sinks here
//! hand every value to an async handler, the way a request handler forwards a live
//! sequence to its transport.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;

pub mod subscribe;

pub use subscribe::SubscribeExt;
