// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for `defer`.

use sluice_sequence::prelude::*;
use sluice_sequence::{defer, iter};
use sluice_test_utils::{assert_completed, counter, probe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_defer_builds_nothing_until_first_pull() -> anyhow::Result<()> {
    // Arrange
    let builds = Arc::new(AtomicUsize::new(0));
    let factory_builds = Arc::clone(&builds);
    let deferred = defer(move || {
        factory_builds.fetch_add(1, Ordering::SeqCst);
        iter(vec![1, 2])
    });

    // Act
    let mut never_pulled = deferred.open();
    never_pulled.close().await?;

    // Assert
    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert_completed(&mut never_pulled).await;
    assert_eq!(builds.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_defer_builds_once_and_reuses() -> anyhow::Result<()> {
    // Arrange
    let builds = Arc::new(AtomicUsize::new(0));
    let factory_builds = Arc::clone(&builds);
    let deferred = defer(move || {
        factory_builds.fetch_add(1, Ordering::SeqCst);
        iter(vec!["a", "b"])
    });

    // Act
    let first = deferred.collect().await?;
    let second = deferred.collect().await?;

    // Assert
    assert_eq!(first, vec!["a", "b"]);
    assert_eq!(second, vec!["a", "b"]);
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_defer_close_reaches_built_source() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(counter());
    let source = Arc::new(source);
    let deferred = defer(move || Arc::clone(&source));
    let mut cursor = deferred.open();

    // Act
    assert_eq!(cursor.pull().await?, Some(0));
    cursor.close().await?;

    // Assert
    assert_eq!(stats.closes(), 1);
    assert_completed(&mut cursor).await;
    Ok(())
}
