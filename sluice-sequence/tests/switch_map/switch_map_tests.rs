// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `switch_map`.

use sluice_sequence::prelude::*;
use sluice_sequence::{hanging, iter};
use sluice_test_utils::{assert_completed, delayed, test_channel, unwrap_pull};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_switch_map_follows_latest_outer_value() -> anyhow::Result<()> {
    // Arrange
    let source = iter(vec![1, 2]).switch_map(|n| iter(vec![n * 10, n * 10 + 1]));

    // Act
    let values = source.collect().await?;

    // Assert
    // Both outer values are ready at once, so the first inner never gets pulled
    assert_eq!(values, vec![20, 21]);
    Ok(())
}

#[tokio::test]
async fn test_switch_map_closes_previous_inner_on_switch() -> anyhow::Result<()> {
    // Arrange
    let inner_closes = Arc::new(AtomicUsize::new(0));
    let closes = Arc::clone(&inner_closes);
    let (tx, symbols) = test_channel::<u32>();
    let mut cursor = symbols
        .switch_map(move |n| {
            let closes = Arc::clone(&closes);
            hanging::<u32>().start_with(vec![n]).finally(move || {
                closes.fetch_add(1, Ordering::SeqCst);
            })
        })
        .open();

    // Act & Assert
    tx.send(1)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await, 1);
    assert_eq!(inner_closes.load(Ordering::SeqCst), 0);

    tx.send(2)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await, 2);
    assert_eq!(inner_closes.load(Ordering::SeqCst), 1);

    cursor.close().await?;
    assert_eq!(inner_closes.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_switch_map_drains_inner_after_outer_completes() -> anyhow::Result<()> {
    // Arrange
    let source = iter(vec![5_u32])
        .switch_map(|n| delayed(Duration::from_millis(10), vec![n, n + 1, n + 2]));

    // Act
    let values = source.collect().await?;

    // Assert
    assert_eq!(values, vec![5, 6, 7]);
    Ok(())
}

#[tokio::test]
async fn test_switch_map_waits_for_next_outer_after_inner_completes() -> anyhow::Result<()> {
    // Arrange
    let (tx, symbols) = test_channel::<&'static str>();
    let mut cursor = symbols
        .switch_map(|symbol| iter(vec![format!("{symbol}:bid"), format!("{symbol}:ask")]))
        .open();

    // Act & Assert
    tx.send("BTC")?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await, "BTC:bid");
    assert_eq!(unwrap_pull(&mut cursor, 500).await, "BTC:ask");

    tx.send("ETH")?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await, "ETH:bid");
    assert_eq!(unwrap_pull(&mut cursor, 500).await, "ETH:ask");

    tx.close();
    assert_completed(&mut cursor).await;
    Ok(())
}
