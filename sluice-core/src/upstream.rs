// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Ownership of a single upstream cursor.
//!
//! [`Upstream`] is the building block every single-source operator uses to hold its
//! source. It guarantees the cleanup rules of the protocol in one place:
//!
//! - the source cursor is opened lazily, on the first pull or an explicit
//!   [`open`](Upstream::open), and at most once;
//! - closing closes the source cursor exactly once, and only if it was opened and has
//!   not finished on its own;
//! - a failed pull closes the source (best effort) before the failure is returned;
//! - once finished or closed, every pull resolves `Ok(None)` without touching the source.

use crate::{Cursor, Result, Sequence};
use std::mem;
use std::sync::Arc;

enum State<S: Sequence> {
    Idle(Arc<S>),
    Running(S::Cursor),
    Finished,
}

/// The upstream cursor owned by one operator stage.
pub struct Upstream<S: Sequence> {
    state: State<S>,
}

impl<S: Sequence> Upstream<S> {
    /// Prepare to pull from `source`. Nothing is opened yet.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            state: State::Idle(source),
        }
    }

    /// Returns `true` once a source cursor has been opened and not yet released.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    /// Returns `true` once the source completed, failed or was closed.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished)
    }

    /// Open the source cursor now instead of on the first pull.
    ///
    /// Does nothing if the source is already running or finished.
    pub fn open(&mut self) {
        if let State::Idle(source) = &self.state {
            let cursor = source.open();
            self.state = State::Running(cursor);
        }
    }

    /// Pull the next value from the source, opening it on first use.
    pub async fn pull(&mut self) -> Result<Option<S::Item>> {
        self.open();

        let State::Running(cursor) = &mut self.state else {
            return Ok(None);
        };

        match cursor.pull().await {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => {
                self.state = State::Finished;
                Ok(None)
            }
            Err(error) => {
                if let Err(close_error) = cursor.close().await {
                    warn!("upstream close after failure also failed: {close_error}");
                }
                self.state = State::Finished;
                Err(error)
            }
        }
    }

    /// Close the source cursor if it is still running. Idempotent.
    pub async fn close(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, State::Finished) {
            State::Running(mut cursor) => cursor.close().await,
            State::Idle(_) | State::Finished => Ok(()),
        }
    }

    /// Close the source while another failure is already being reported.
    ///
    /// A failure of the close itself is logged and dropped; the caller returns its
    /// primary error.
    pub async fn abort(&mut self) {
        if let Err(error) = self.close().await {
            warn!("upstream close during abort failed: {error}");
        }
    }
}
