// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Take-until operator: a sequence governed by an external termination trigger.
//!
//! Each pull races the governed upstream against the trigger. Values flow through
//! unchanged until the trigger fires; from then on the upstream is closed and the
//! output is complete.
//!
//! A trigger can be a future, an async callback, another sequence (its first value
//! fires) or a [`CancellationToken`]. What happens when the trigger itself fails is
//! selected with [`TriggerErrorPolicy`]:
//!
//! - [`take_until`](TakeUntilExt::take_until) uses [`TriggerErrorPolicy::Ignore`]: the
//!   failure is logged, the trigger is disarmed and the governed sequence continues.
//! - [`take_until_with`](TakeUntilExt::take_until_with) accepts an explicit policy;
//!   [`TriggerErrorPolicy::Propagate`] ends the output with the trigger's error.
//!
//! A sequence trigger that completes without emitting disarms the trigger as well.
//!
//! # Example
//!
//! ```
//! use sluice_core::CancellationToken;
//! use sluice_sequence::prelude::*;
//! use sluice_sequence::iter;
//!
//! # #[tokio::main]
//! # async fn main() -> sluice_core::Result<()> {
//! let shutdown = CancellationToken::new();
//! shutdown.cancel();
//!
//! let ticks = iter(0..).take_until(shutdown);
//! assert!(ticks.collect().await?.is_empty());
//! # Ok(())
//! # }
//! ```

use crate::map::MapExt;
use async_trait::async_trait;
use futures::future::{select, BoxFuture, Either, Shared};
use futures::FutureExt;
use sluice_core::{
    close_all, BoxSequence, CancellationToken, Cursor, Result, Sequence, SluiceError, Upstream,
};
use std::fmt;
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use tokio::sync::Mutex;

type Callback = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;
type TriggerUpstream = Arc<Mutex<Upstream<BoxSequence<()>>>>;

/// An external signal that forces early completion of a governed sequence.
#[derive(Clone)]
pub enum Trigger {
    /// Fires when the future resolves. The future is shared by every cursor: once it
    /// has resolved, newly opened cursors complete immediately.
    Future(Shared<BoxFuture<'static, Result<()>>>),
    /// Invoked once per cursor on its first pull; fires when the returned future
    /// resolves.
    Callback(Callback),
    /// Opened once per cursor on its first pull; fires on its first value.
    Sequence(BoxSequence<()>),
    /// Fires when the token is cancelled.
    Token(CancellationToken),
}

impl Trigger {
    /// Trigger on resolution of `future`.
    pub fn future<F>(future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self::Future(future.boxed().shared())
    }

    /// Trigger on resolution of the future returned by `callback`.
    pub fn callback<F, Fut>(callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::Callback(Arc::new(move || callback().boxed()))
    }

    /// Trigger on the first value of `sequence`.
    pub fn sequence<S: Sequence>(sequence: S) -> Self {
        Self::Sequence(sequence.map(|_| ()).boxed())
    }
}

impl From<CancellationToken> for Trigger {
    fn from(token: CancellationToken) -> Self {
        Self::Token(token)
    }
}

impl From<BoxSequence<()>> for Trigger {
    fn from(sequence: BoxSequence<()>) -> Self {
        Self::Sequence(sequence)
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Future(_) => "Future",
            Self::Callback(_) => "Callback",
            Self::Sequence(_) => "Sequence",
            Self::Token(_) => "Token",
        };
        f.debug_tuple("Trigger").field(&kind).finish()
    }
}

/// What a take-until cursor does when its trigger fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerErrorPolicy {
    /// Log the failure, disarm the trigger and keep yielding values.
    #[default]
    Ignore,
    /// Close the governed upstream and return the trigger's error.
    Propagate,
}

/// Extension trait providing [`take_until`](TakeUntilExt::take_until).
pub trait TakeUntilExt: Sequence + Sized {
    /// Yield values until `trigger` fires, ignoring trigger failures.
    fn take_until(self, trigger: impl Into<Trigger>) -> TakeUntil<Self> {
        self.take_until_with(trigger, TriggerErrorPolicy::Ignore)
    }

    /// Yield values until `trigger` fires, handling trigger failures per `policy`.
    fn take_until_with(
        self,
        trigger: impl Into<Trigger>,
        policy: TriggerErrorPolicy,
    ) -> TakeUntil<Self>;
}

impl<S: Sequence> TakeUntilExt for S {
    fn take_until_with(
        self,
        trigger: impl Into<Trigger>,
        policy: TriggerErrorPolicy,
    ) -> TakeUntil<Self> {
        TakeUntil {
            source: Arc::new(self),
            trigger: trigger.into(),
            policy,
        }
    }
}

/// Sequence returned by [`TakeUntilExt::take_until`].
pub struct TakeUntil<S> {
    source: Arc<S>,
    trigger: Trigger,
    policy: TriggerErrorPolicy,
}

impl<S: Sequence> Sequence for TakeUntil<S> {
    type Item = S::Item;
    type Cursor = TakeUntilCursor<S>;

    fn open(&self) -> Self::Cursor {
        TakeUntilCursor {
            upstream: Upstream::new(Arc::clone(&self.source)),
            trigger: Some(self.trigger.clone()),
            armed: None,
            trigger_upstream: None,
            policy: self.policy,
            done: false,
        }
    }
}

enum Signal {
    Fired,
    Disarmed,
    Failed(SluiceError),
}

impl From<Result<()>> for Signal {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Fired,
            Err(error) => Self::Failed(error),
        }
    }
}

enum Step<T> {
    Upstream(Result<Option<T>>),
    // The trigger resolved without firing; the upstream pull was still awaited
    Resumed(Signal, Result<Option<T>>),
    Fired,
    Abort(SluiceError),
}

/// Cursor of [`TakeUntil`].
pub struct TakeUntilCursor<S: Sequence> {
    upstream: Upstream<S>,
    // Taken on the first pull, when the trigger is armed
    trigger: Option<Trigger>,
    armed: Option<BoxFuture<'static, Signal>>,
    trigger_upstream: Option<TriggerUpstream>,
    policy: TriggerErrorPolicy,
    done: bool,
}

impl<S: Sequence> TakeUntilCursor<S> {
    fn arm(&mut self) {
        let Some(trigger) = self.trigger.take() else {
            return;
        };

        let armed = match trigger {
            Trigger::Future(shared) => shared.map(Signal::from).boxed(),
            Trigger::Callback(callback) => callback().map(Signal::from).boxed(),
            Trigger::Token(token) => async move {
                token.cancelled().await;
                Signal::Fired
            }
            .boxed(),
            Trigger::Sequence(sequence) => {
                let cell = Arc::new(Mutex::new(Upstream::new(Arc::new(sequence))));
                self.trigger_upstream = Some(Arc::clone(&cell));
                async move {
                    match cell.lock().await.pull().await {
                        Ok(Some(())) => Signal::Fired,
                        Ok(None) => Signal::Disarmed,
                        Err(error) => Signal::Failed(error),
                    }
                }
                .boxed()
            }
        };
        self.armed = Some(armed);
    }

    async fn close_trigger(&mut self) -> Result<()> {
        // The armed future may hold the trigger cursor's lock
        self.armed = None;
        match self.trigger_upstream.take() {
            Some(cell) => cell.lock().await.close().await,
            None => Ok(()),
        }
    }

    async fn disarm(&mut self, signal: Signal) {
        match signal {
            Signal::Failed(error) => warn!("take_until: ignoring trigger failure: {error}"),
            _ => debug!("take_until: trigger completed without firing"),
        }
        if let Err(close_error) = self.close_trigger().await {
            warn!("take_until: closing disarmed trigger: {close_error}");
        }
    }

    async fn close_both(&mut self) -> Result<()> {
        self.done = true;
        self.armed = None;
        let trigger_upstream = self.trigger_upstream.take();
        let upstream = &mut self.upstream;

        let closes: [BoxFuture<'_, Result<()>>; 2] = [
            Box::pin(upstream.close()),
            Box::pin(async move {
                match trigger_upstream {
                    Some(cell) => cell.lock().await.close().await,
                    None => Ok(()),
                }
            }),
        ];
        close_all(closes).await
    }
}

#[async_trait]
impl<S: Sequence> Cursor for TakeUntilCursor<S> {
    type Item = S::Item;

    async fn pull(&mut self) -> Result<Option<S::Item>> {
        if self.done {
            return Ok(None);
        }
        self.arm();

        let policy = self.policy;
        let step = {
            let pull = pin!(self.upstream.pull());
            match self.armed.as_mut() {
                Some(armed) => match select(armed, pull).await {
                    Either::Left((Signal::Fired, _)) => Step::Fired,
                    Either::Left((Signal::Failed(error), _))
                        if policy == TriggerErrorPolicy::Propagate =>
                    {
                        Step::Abort(error)
                    }
                    Either::Left((signal, pull)) => Step::Resumed(signal, pull.await),
                    Either::Right((result, _)) => Step::Upstream(result),
                },
                None => Step::Upstream(pull.await),
            }
        };

        let result = match step {
            Step::Fired => {
                self.close_both().await?;
                return Ok(None);
            }
            Step::Abort(error) => {
                if let Err(close_error) = self.close_both().await {
                    warn!("take_until: cleanup after trigger failure: {close_error}");
                }
                return Err(error);
            }
            Step::Resumed(signal, result) => {
                self.disarm(signal).await;
                result
            }
            Step::Upstream(result) => result,
        };

        match result {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => {
                self.done = true;
                self.close_trigger().await?;
                Ok(None)
            }
            Err(error) => {
                self.done = true;
                if let Err(close_error) = self.close_trigger().await {
                    warn!("take_until: closing trigger after upstream failure: {close_error}");
                }
                Err(error)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.done {
            return Ok(());
        }
        self.trigger = None;
        self.close_both().await
    }
}
