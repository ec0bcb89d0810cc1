// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token.
//!
//! Tokens are the out-of-band close signal of the protocol: a pull that is already in
//! flight cannot be interrupted through `&mut` access, so operators race it against a
//! token instead and observe the signal when they resume.

use event_listener::{Event, EventListener};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// A one-shot close signal shared by all of its clones.
///
/// Firing any clone releases every pending `cancelled()` future.
///
/// # Example
///
/// ```
/// use sluice_core::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let waiter = token.clone();
///
/// let handle = tokio::spawn(async move {
///     waiter.cancelled().await;
/// });
///
/// token.cancel();
/// handle.await.unwrap();
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    fired: AtomicBool,
    waiters: Event,
}

impl CancellationToken {
    /// A token that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token. Only the first call wakes waiters.
    pub fn cancel(&self) {
        if !self.shared.fired.swap(true, Ordering::AcqRel) {
            self.shared.waiters.notify(usize::MAX);
        }
    }

    /// Whether the token has fired.
    ///
    /// ```
    /// use sluice_core::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// assert!(!token.is_cancelled());
    ///
    /// token.cancel();
    /// assert!(token.is_cancelled());
    /// ```
    pub fn is_cancelled(&self) -> bool {
        self.shared.fired.load(Ordering::Acquire)
    }

    /// Wait until the token is cancelled. Resolves immediately if it already is.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            if self.token.is_cancelled() {
                return Poll::Ready(());
            }

            match self.listener.as_mut() {
                Some(listener) => {
                    if Pin::new(listener).poll(cx).is_pending() {
                        return Poll::Pending;
                    }
                    // Woken: drop the spent listener and re-check the flag
                    self.listener = None;
                }
                None => {
                    // Register first, then loop to re-check the flag, so a cancel()
                    // racing with listen() is not missed
                    let listener = self.token.shared.waiters.listen();
                    self.listener = Some(listener);
                }
            }
        }
    }
}
