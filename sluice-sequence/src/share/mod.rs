// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Share operator: fan one upstream cursor out to many subscribers.
//!
//! [`ShareExt::share`] turns a sequence into a [`SharedSequence`]. Every cursor opened
//! on it is a subscriber, and all subscribers that are live at the same time pull
//! from one upstream cursor.
//!
//! # Behavior
//!
//! - A subscriber joins the group on its first pull. The first to join opens the
//!   upstream cursor
//! - Subscribers pulling concurrently share a single in-flight upstream pull and all
//!   receive its value. Values are not buffered: a subscriber only sees values pulled
//!   while it was waiting
//! - Completion or failure of the upstream is delivered to every waiting subscriber;
//!   later pulls complete
//! - The last subscriber to leave closes the upstream and waits for that close.
//!   A subscriber joining during the close waits for it to finish before opening a
//!   fresh upstream cursor, so two upstream cursors are never live at once
//! - Each subscriber has a close signal ([`ShareCursor::close_signal`]). Cancelling
//!   it ends a pull that is in flight with completion, without waiting for the shared
//!   upstream pull to resolve
//!
//! # Example
//!
//! ```
//! use sluice_core::Cursor;
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::iter;
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let prices = iter(vec![101, 102, 103]).share();
//!
//! let mut dashboard = prices.open();
//! let mut risk = prices.open();
//!
//! assert_eq!(dashboard.pull().await?, Some(101));
//! // No replay: the second subscriber starts at the next upstream value
//! assert_eq!(risk.pull().await?, Some(102));
//! assert_eq!(prices.subscriber_count(), 2);
//!
//! dashboard.close().await?;
//! risk.close().await?;
//! assert_eq!(prices.subscriber_count(), 0);
//! # Ok(())
//! # }
//! ```

mod group;

use self::group::{Group, Join};
use async_trait::async_trait;
use futures::future::{select, Either};
use sluice_core::{CancellationToken, Cursor, Result, Sequence};
use std::pin::pin;
use std::sync::Arc;

/// Extension trait providing [`share`](ShareExt::share).
pub trait ShareExt: Sequence + Sized {
    /// Multiplex one upstream cursor to every cursor opened on the result.
    ///
    /// See the [module-level documentation](crate::share) for the subscription rules.
    fn share(self) -> SharedSequence<Self>
    where
        Self::Item: Clone + Sync;
}

impl<S: Sequence> ShareExt for S {
    fn share(self) -> SharedSequence<Self>
    where
        Self::Item: Clone + Sync,
    {
        SharedSequence {
            group: Arc::new(Group::new(Arc::new(self))),
        }
    }
}

/// Sequence returned by [`ShareExt::share`]. Cheap to clone; clones share the group.
pub struct SharedSequence<S: Sequence> {
    group: Arc<Group<S>>,
}

impl<S: Sequence> Clone for SharedSequence<S> {
    fn clone(&self) -> Self {
        Self {
            group: Arc::clone(&self.group),
        }
    }
}

impl<S> SharedSequence<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    /// Number of subscribers currently in the group.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.group.subscriber_count()
    }

    /// Returns `true` while an upstream cursor is open and not yet exhausted.
    #[must_use]
    pub fn is_upstream_live(&self) -> bool {
        self.group.is_upstream_live()
    }
}

impl<S> Sequence for SharedSequence<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    type Item = S::Item;
    type Cursor = ShareCursor<S>;

    fn open(&self) -> Self::Cursor {
        ShareCursor {
            group: Arc::clone(&self.group),
            membership: Membership::NotJoined,
            close_signal: CancellationToken::new(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Membership {
    NotJoined,
    Joined,
    Left,
}

/// A subscriber of a [`SharedSequence`].
pub struct ShareCursor<S: Sequence> {
    group: Arc<Group<S>>,
    membership: Membership,
    close_signal: CancellationToken,
}

impl<S> ShareCursor<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    /// Token that closes this subscriber out of band.
    ///
    /// Cancelling it makes a pending [`pull`](Cursor::pull) complete immediately; the
    /// subscriber then leaves the group.
    pub fn close_signal(&self) -> CancellationToken {
        self.close_signal.clone()
    }

    /// Join the group, waiting out a teardown in progress.
    ///
    /// Returns `false` if the close signal fired while waiting; the subscriber has then
    /// left without joining.
    async fn join(&mut self) -> bool {
        loop {
            match self.group.join() {
                Join::Joined => break,
                Join::Wait(teardown) => {
                    let signal = self.close_signal.clone();
                    match select(pin!(signal.cancelled()), teardown).await {
                        Either::Left(((), _)) => {
                            self.membership = Membership::Left;
                            return false;
                        }
                        Either::Right((Err(error), _)) => {
                            debug!("share: previous upstream closed with error: {error}");
                        }
                        Either::Right((Ok(()), _)) => {}
                    }
                }
            }
        }
        self.membership = Membership::Joined;
        true
    }

    async fn leave(&mut self) -> Result<()> {
        if self.membership != Membership::Joined {
            self.membership = Membership::Left;
            return Ok(());
        }
        self.membership = Membership::Left;

        match self.group.leave() {
            Some(teardown) => teardown.await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S> Cursor for ShareCursor<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.membership == Membership::Left || self.close_signal.is_cancelled() {
            self.leave().await?;
            return Ok(None);
        }
        if self.membership == Membership::NotJoined && !self.join().await {
            return Ok(None);
        }

        let Some(pull) = self.group.pull() else {
            self.leave().await?;
            return Ok(None);
        };

        let signal = self.close_signal.clone();
        let outcome = match select(pin!(signal.cancelled()), pull).await {
            Either::Left(((), _)) => None,
            Either::Right((result, _)) => Some(result),
        };

        match outcome {
            Some(Ok(Some(value))) => Ok(Some(value)),
            None | Some(Ok(None)) => {
                self.leave().await?;
                Ok(None)
            }
            Some(Err(error)) => {
                if let Err(close_error) = self.leave().await {
                    warn!("share: leaving after upstream failure: {close_error}");
                }
                Err(error)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.close_signal.cancel();
        self.leave().await
    }
}
