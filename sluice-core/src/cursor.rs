// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The cursor side of the protocol: live pull state over a sequence.

use crate::Result;
use async_trait::async_trait;

/// Live, pull-based state over a [`Sequence`](crate::Sequence).
///
/// A cursor hands out values one pull at a time. `Ok(None)` signals completion and
/// `Err(_)` a failure; both end the cursor.
///
/// # Contract
///
/// - **Single outstanding pull**: enforced by `&mut self`.
/// - **Close is final**: once [`close`](Self::close) has resolved, every later
///   [`pull`](Self::pull) resolves `Ok(None)` without producing anything.
/// - **Close is idempotent**: calling it again has no further effect and never fails
///   because the cursor was already closed.
/// - **Dropped pulls**: a pull future that is dropped before it resolves may lose the
///   value it was fetching. The cursor must still accept `close` afterwards.
///
/// Dropping a cursor does not run asynchronous cleanup. Call `close` to release the
/// upstream resources a cursor holds.
#[async_trait]
pub trait Cursor: Send + 'static {
    /// The values this cursor yields
    type Item: Send + 'static;

    /// Pull the next value, suspending until one is available.
    async fn pull(&mut self) -> Result<Option<Self::Item>>;

    /// Terminate the cursor early, releasing every upstream it opened.
    async fn close(&mut self) -> Result<()>;
}

/// A type-erased cursor.
pub type BoxCursor<T> = Box<dyn Cursor<Item = T>>;

#[async_trait]
impl<C> Cursor for Box<C>
where
    C: Cursor + ?Sized,
{
    type Item = C::Item;

    async fn pull(&mut self) -> Result<Option<Self::Item>> {
        (**self).pull().await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}
