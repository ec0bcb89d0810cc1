// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! State of one shared cursor group: N subscribers over one upstream cursor.
//!
//! All bookkeeping happens under a synchronous lock that is never held across an
//! await. Pulls and teardowns are created under the lock as shared futures, then
//! awaited outside of it, so every transition is decided before control is yielded.

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use sluice_core::{Cursor, Result, Sequence};
use std::mem;
use std::sync::{Arc, Weak};

pub(super) type SharedPull<T> = Shared<BoxFuture<'static, Result<Option<T>>>>;
pub(super) type Teardown = Shared<BoxFuture<'static, Result<()>>>;

type UpstreamCell<S> = Arc<tokio::sync::Mutex<<S as Sequence>::Cursor>>;

enum UpstreamSlot<S: Sequence> {
    Idle,
    Live(UpstreamCell<S>),
    // Completed or failed while subscribers were still attached
    Exhausted,
}

struct State<S: Sequence> {
    subscribers: usize,
    upstream: UpstreamSlot<S>,
    in_flight: Option<(u64, SharedPull<S::Item>)>,
    teardown: Option<Teardown>,
    next_pull_id: u64,
}

/// Outcome of an attempt to join the group.
pub(super) enum Join {
    Joined,
    /// The previous upstream is still being closed; await this and retry.
    Wait(Teardown),
}

pub(super) struct Group<S: Sequence> {
    source: Arc<S>,
    state: Mutex<State<S>>,
}

impl<S> Group<S>
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    pub(super) fn new(source: Arc<S>) -> Self {
        Self {
            source,
            state: Mutex::new(State {
                subscribers: 0,
                upstream: UpstreamSlot::Idle,
                in_flight: None,
                teardown: None,
                next_pull_id: 0,
            }),
        }
    }

    pub(super) fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers
    }

    pub(super) fn is_upstream_live(&self) -> bool {
        matches!(self.state.lock().upstream, UpstreamSlot::Live(_))
    }

    /// Register a subscriber. The first one opens the upstream cursor.
    pub(super) fn join(&self) -> Join {
        let mut state = self.state.lock();
        if let Some(teardown) = &state.teardown {
            return Join::Wait(teardown.clone());
        }

        state.subscribers += 1;
        if state.subscribers == 1 {
            debug!("share: first subscriber, opening upstream");
            let cursor = self.source.open();
            state.upstream = UpstreamSlot::Live(Arc::new(tokio::sync::Mutex::new(cursor)));
        }
        Join::Joined
    }

    /// The pull every live subscriber should await next, or `None` once the upstream
    /// is exhausted.
    ///
    /// Concurrent callers receive the same in-flight pull, so the upstream is pulled
    /// once per value however many subscribers are waiting.
    pub(super) fn pull(self: &Arc<Self>) -> Option<SharedPull<S::Item>> {
        let mut state = self.state.lock();
        let UpstreamSlot::Live(cell) = &state.upstream else {
            return None;
        };
        if let Some((_, pull)) = &state.in_flight {
            return Some(pull.clone());
        }

        let cell = Arc::clone(cell);
        let id = state.next_pull_id;
        state.next_pull_id += 1;

        let group = Arc::downgrade(self);
        let pull = async move {
            let result = cell.lock().await.pull().await;
            if let Some(group) = group.upgrade() {
                group.settle(id, &cell, !matches!(result, Ok(Some(_))));
            }
            if result.is_err() {
                if let Err(close_error) = cell.lock().await.close().await {
                    warn!("share: closing failed upstream: {close_error}");
                }
            }
            result
        }
        .boxed()
        .shared();

        state.in_flight = Some((id, pull.clone()));
        Some(pull)
    }

    fn settle(&self, id: u64, cell: &UpstreamCell<S>, ended: bool) {
        let mut state = self.state.lock();
        if matches!(&state.in_flight, Some((current, _)) if *current == id) {
            state.in_flight = None;
        }
        if ended {
            if let UpstreamSlot::Live(live) = &state.upstream {
                if Arc::ptr_eq(live, cell) {
                    state.upstream = UpstreamSlot::Exhausted;
                }
            }
        }
    }

    /// Unregister a subscriber. The last one tears the upstream down; the returned
    /// teardown must be awaited before the close is reported complete.
    pub(super) fn leave(self: &Arc<Self>) -> Option<Teardown> {
        let mut state = self.state.lock();
        state.subscribers = state.subscribers.saturating_sub(1);
        if state.subscribers > 0 {
            return None;
        }

        // A pull nobody awaits any more must not be delivered to a later subscriber
        state.in_flight = None;
        let UpstreamSlot::Live(cell) = mem::replace(&mut state.upstream, UpstreamSlot::Idle) else {
            return None;
        };

        debug!("share: last subscriber left, closing upstream");
        let teardown = close_upstream(cell, Arc::downgrade(self));
        state.teardown = Some(teardown.clone());
        Some(teardown)
    }

    fn finish_teardown(&self) {
        self.state.lock().teardown = None;
    }
}

fn close_upstream<S>(cell: UpstreamCell<S>, group: Weak<Group<S>>) -> Teardown
where
    S: Sequence,
    S::Item: Clone + Sync,
{
    async move {
        let result = cell.lock().await.close().await;
        if let Some(group) = group.upgrade() {
            group.finish_teardown();
        }
        result
    }
    .boxed()
    .shared()
}
