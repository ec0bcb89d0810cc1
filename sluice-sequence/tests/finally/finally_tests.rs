// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for `finally`.

use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::{counter, probe, ErrorInjectingSequence};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn call_counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let callback_calls = Arc::clone(&calls);
    (calls, move || {
        callback_calls.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test]
async fn test_finally_runs_once_on_completion() -> anyhow::Result<()> {
    // Arrange
    let (calls, callback) = call_counter();
    let mut cursor = iter(vec![1, 2]).finally(callback).open();

    // Act
    while cursor.pull().await?.is_some() {
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
    cursor.pull().await?;
    cursor.close().await?;

    // Assert
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_finally_runs_after_upstream_close() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(counter());
    let closes_seen = Arc::new(AtomicUsize::new(usize::MAX));
    let observed = Arc::clone(&closes_seen);
    let observer_stats = stats.clone();
    let mut cursor = source
        .finally(move || observed.store(observer_stats.closes(), Ordering::SeqCst))
        .open();

    // Act
    cursor.pull().await?;
    cursor.close().await?;

    // Assert
    assert_eq!(closes_seen.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_finally_runs_once_on_failure() -> anyhow::Result<()> {
    // Arrange
    let (calls, callback) = call_counter();
    let source = ErrorInjectingSequence::new(counter(), 1).finally(callback);

    // Act
    let result = source.collect().await;

    // Assert
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_finally_skipped_for_cursor_that_never_started() -> anyhow::Result<()> {
    // Arrange
    let (calls, callback) = call_counter();
    let mut cursor = counter().finally(callback).open();

    // Act
    cursor.close().await?;

    // Assert
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    Ok(())
}
