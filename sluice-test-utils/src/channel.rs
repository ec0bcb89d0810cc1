// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Channel-backed sequences driven from the test body.
//!
//! The sequence models a single-subscription producer such as a socket or a pub/sub
//! subscription: only one cursor can consume it at a time. A cursor takes the receiver
//! on its first pull and hands it back when it ends, so the sequence can be
//! subscribed again afterwards. Values sent while nobody is subscribed stay queued.

use async_trait::async_trait;
use parking_lot::Mutex;
use sluice_core::{Cursor, Result, Sequence, SluiceError};
use std::sync::Arc;
use tokio::sync::mpsc;

type Receiver<T> = mpsc::UnboundedReceiver<Result<T>>;
type ReceiverSlot<T> = Arc<Mutex<Option<Receiver<T>>>>;

/// Creates a test channel: a sender for the test and a sequence for the operator.
///
/// Dropping every sender completes the sequence once the queued values are consumed.
pub fn test_channel<T: Send + 'static>() -> (TestSender<T>, ChannelSequence<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        TestSender { tx },
        ChannelSequence {
            slot: Arc::new(Mutex::new(Some(rx))),
        },
    )
}

/// Sending half of a [`test_channel`].
pub struct TestSender<T> {
    tx: mpsc::UnboundedSender<Result<T>>,
}

impl<T> Clone for TestSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> TestSender<T> {
    /// Send a value.
    ///
    /// # Errors
    ///
    /// Returns [`SluiceError::ChannelClosed`] if the sequence has been dropped.
    pub fn send(&self, value: T) -> Result<()> {
        self.tx
            .send(Ok(value))
            .map_err(|_| SluiceError::channel_closed("test channel sequence dropped"))
    }

    /// Make the pull that receives this entry fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns [`SluiceError::ChannelClosed`] if the sequence has been dropped.
    pub fn send_error(&self, error: SluiceError) -> Result<()> {
        self.tx
            .send(Err(error))
            .map_err(|_| SluiceError::channel_closed("test channel sequence dropped"))
    }

    /// Complete the sequence by dropping this sender.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Receiving half of a [`test_channel`], as a single-subscription sequence.
pub struct ChannelSequence<T> {
    slot: ReceiverSlot<T>,
}

impl<T> ChannelSequence<T> {
    /// Returns `true` while a cursor holds the receiver.
    pub fn is_subscribed(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<T: Send + 'static> Sequence for ChannelSequence<T> {
    type Item = T;
    type Cursor = ChannelCursor<T>;

    fn open(&self) -> Self::Cursor {
        ChannelCursor {
            slot: Arc::clone(&self.slot),
            receiver: None,
            ended: false,
        }
    }
}

/// Cursor of a [`ChannelSequence`].
pub struct ChannelCursor<T> {
    slot: ReceiverSlot<T>,
    receiver: Option<Receiver<T>>,
    ended: bool,
}

impl<T> ChannelCursor<T> {
    fn release(&mut self) {
        self.ended = true;
        if let Some(receiver) = self.receiver.take() {
            *self.slot.lock() = Some(receiver);
        }
    }
}

#[async_trait]
impl<T: Send + 'static> Cursor for ChannelCursor<T> {
    type Item = T;

    async fn pull(&mut self) -> Result<Option<T>> {
        if self.ended {
            return Ok(None);
        }
        if self.receiver.is_none() {
            let taken = self.slot.lock().take();
            match taken {
                Some(receiver) => self.receiver = Some(receiver),
                None => {
                    self.ended = true;
                    return Err(SluiceError::stream_error(
                        "test channel already has a live subscriber",
                    ));
                }
            }
        }

        let Some(receiver) = self.receiver.as_mut() else {
            return Ok(None);
        };
        match receiver.recv().await {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(error)) => {
                self.release();
                Err(error)
            }
            None => {
                self.release();
                Ok(None)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.release();
        Ok(())
    }
}

impl<T> Drop for ChannelCursor<T> {
    fn drop(&mut self) {
        self.release();
    }
}
