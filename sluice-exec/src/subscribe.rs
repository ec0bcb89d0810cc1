// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use futures::future::{select, Either};
use sluice_core::{CancellationToken, Cursor, Result, Sequence, SluiceError};
use std::error::Error;
use std::future::Future;
use std::pin::pin;

/// Extension trait driving a sequence into an async handler.
#[async_trait]
pub trait SubscribeExt: Sequence + Sized {
    /// Opens a cursor and hands every value to `on_next_func`, one at a time.
    ///
    /// Each handler call runs to completion before the next value is pulled, so a slow
    /// handler applies backpressure all the way up the operator chain.
    ///
    /// # Behavior
    ///
    /// - Runs until the sequence completes, fails, or the cancellation token fires
    /// - Cancelling the token interrupts a pull that is waiting for a value and closes
    ///   the cursor; a handler that is already running is not interrupted, it receives
    ///   the token and can observe it
    /// - Handler errors go to `on_error_callback` when one is given and the loop
    ///   continues; otherwise they are collected and returned once the loop ends
    /// - A failure of the sequence itself ends the loop and is returned
    ///
    /// # Errors
    ///
    /// - The sequence failure, if the sequence failed
    /// - Otherwise the collected handler errors, when no callback was given: the error
    ///   itself for a single one, [`SluiceError::MultipleErrors`] for several
    /// - A failure to close the cursor after cancellation is reported with them
    ///
    /// # Example
    ///
    /// ```
    /// use sluice_core::CancellationToken;
    /// use sluice_exec::SubscribeExt;
    /// use sluice_sequence::iter;
    /// use std::sync::{Arc, Mutex};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// let sent = Arc::new(Mutex::new(Vec::new()));
    /// let frames = Arc::clone(&sent);
    ///
    /// iter(vec!["BTC:101", "ETH:55"])
    ///     .subscribe(
    ///         move |frame, _token: CancellationToken| {
    ///             let frames = Arc::clone(&frames);
    ///             async move {
    ///                 frames.lock().unwrap().push(frame);
    ///                 Ok::<(), std::io::Error>(())
    ///             }
    ///         },
    ///         None,
    ///         None::<fn(std::io::Error)>,
    ///     )
    ///     .await?;
    ///
    /// assert_eq!(*sent.lock().unwrap(), vec!["BTC:101", "ETH:55"]);
    /// # Ok(())
    /// # }
    /// ```
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        cancellation_token: Option<CancellationToken>,
        on_error_callback: Option<OnError>,
    ) -> Result<()>
    where
        F: Fn(Self::Item, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
        OnError: Fn(E) + Send + Sync + 'static;
}

#[async_trait]
impl<S: Sequence> SubscribeExt for S {
    async fn subscribe<F, Fut, E, OnError>(
        self,
        on_next_func: F,
        cancellation_token: Option<CancellationToken>,
        on_error_callback: Option<OnError>,
    ) -> Result<()>
    where
        F: Fn(Self::Item, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Error + Send + Sync + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
    {
        let cancellation_token = cancellation_token.unwrap_or_default();
        let mut cursor = self.open();
        let mut collected_errors = Vec::new();

        loop {
            let next = match select(pin!(cancellation_token.cancelled()), cursor.pull()).await {
                Either::Left(((), _)) => None,
                Either::Right((result, _)) => Some(result),
            };

            match next {
                Some(Ok(Some(item))) => {
                    let result = on_next_func(item, cancellation_token.clone()).await;
                    if let Err(error) = result {
                        match &on_error_callback {
                            Some(on_error_callback) => on_error_callback(error),
                            None => collected_errors.push(SluiceError::user_error(error)),
                        }
                    }
                }
                Some(Ok(None)) => break,
                Some(Err(error)) => {
                    if !collected_errors.is_empty() {
                        warn!(
                            "subscribe: dropping {} handler errors, the sequence failed",
                            collected_errors.len()
                        );
                    }
                    error!("subscribe: sequence failed: {error}");
                    return Err(error);
                }
                None => {
                    // Cancelled while waiting; the pull was dropped
                    if let Err(error) = cursor.close().await {
                        collected_errors.push(error);
                    }
                    break;
                }
            }
        }

        SluiceError::from_errors(collected_errors).map_or(Ok(()), Err)
    }
}
