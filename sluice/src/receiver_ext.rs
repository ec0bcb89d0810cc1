// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension methods for tokio's `UnboundedReceiver` to create sequences.

use async_trait::async_trait;
use parking_lot::Mutex;
use sluice_core::{Cursor, Result, Sequence, SluiceError};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Extension trait for `UnboundedReceiver` to create sequences.
pub trait ReceiverExt<T> {
    /// Wraps the receiver as a single-subscription sequence.
    ///
    /// The first pull of a cursor takes the receiver, and the cursor gives it back when
    /// it completes or is closed. A cursor opened later resumes with whatever was sent
    /// in between; nothing is lost and nothing is replayed. Only one cursor can hold the
    /// receiver at a time, a second one fails with [`SluiceError::ChannelClosed`]. Use
    /// [`share`](sluice_sequence::ShareExt::share) to feed several consumers.
    ///
    /// The sequence completes once every sender is dropped and the queue is drained.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice::prelude::*;
    /// use tokio::sync::mpsc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice::Result<()> {
    /// let (tx, rx) = mpsc::unbounded_channel();
    /// let orders = rx.into_sequence();
    ///
    /// tx.send("buy").ok();
    /// tx.send("sell").ok();
    ///
    /// let mut cursor = orders.open();
    /// assert_eq!(cursor.pull().await?, Some("buy"));
    /// cursor.close().await?;
    ///
    /// // The queued value is still there for the next subscriber
    /// drop(tx);
    /// assert_eq!(orders.collect().await?, vec!["sell"]);
    /// # Ok(())
    /// # }
    /// ```
    fn into_sequence(self) -> ReceiverSequence<T>;
}

impl<T: Send + 'static> ReceiverExt<T> for UnboundedReceiver<T> {
    fn into_sequence(self) -> ReceiverSequence<T> {
        ReceiverSequence {
            slot: Arc::new(Mutex::new(Some(self))),
        }
    }
}

type ReceiverSlot<T> = Arc<Mutex<Option<UnboundedReceiver<T>>>>;

/// Sequence returned by [`ReceiverExt::into_sequence`].
pub struct ReceiverSequence<T> {
    slot: ReceiverSlot<T>,
}

impl<T> Clone for ReceiverSequence<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> ReceiverSequence<T> {
    /// Returns `true` while a cursor holds the receiver.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<T: Send + 'static> Sequence for ReceiverSequence<T> {
    type Item = T;
    type Cursor = ReceiverCursor<T>;

    fn open(&self) -> Self::Cursor {
        ReceiverCursor {
            slot: Arc::clone(&self.slot),
            receiver: None,
            done: false,
        }
    }
}

/// Cursor of a [`ReceiverSequence`].
pub struct ReceiverCursor<T> {
    slot: ReceiverSlot<T>,
    receiver: Option<UnboundedReceiver<T>>,
    done: bool,
}

impl<T> ReceiverCursor<T> {
    fn give_back(&mut self) {
        self.done = true;
        if let Some(receiver) = self.receiver.take() {
            *self.slot.lock() = Some(receiver);
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Cursor for ReceiverCursor<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Option<T>> {
        if self.done {
            return Ok(None);
        }
        if self.receiver.is_none() {
            let taken = self.slot.lock().take();
            let Some(receiver) = taken else {
                self.done = true;
                return Err(SluiceError::channel_closed(
                    "receiver is held by another cursor",
                ));
            };
            self.receiver = Some(receiver);
        }

        let Some(receiver) = self.receiver.as_mut() else {
            return Ok(None);
        };
        match receiver.recv().await {
            Some(value) => Ok(Some(value)),
            None => {
                self.give_back();
                Ok(None)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.give_back();
        Ok(())
    }
}

impl<T> Drop for ReceiverCursor<T> {
    fn drop(&mut self) {
        self.give_back();
    }
}
