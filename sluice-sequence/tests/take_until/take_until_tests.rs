// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `take_until`.

use sluice_core::CancellationToken;
use sluice_sequence::prelude::*;
use sluice_sequence::{empty, iter};
use sluice_test_utils::{assert_completed, counter, probe, test_channel, unwrap_pull};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_take_until_token_stops_values() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let (source, stats) = probe(counter());
    let mut cursor = source.take_until(token.clone()).open();

    // Act
    let first = cursor.pull().await?;
    token.cancel();

    // Assert
    assert_eq!(first, Some(0));
    assert_completed(&mut cursor).await;
    assert_eq!(stats.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn test_take_until_interrupts_pending_pull() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let (_tx, channel) = test_channel::<u32>();
    let (source, stats) = probe(channel);
    let mut cursor = source.take_until(token.clone()).open();

    // Act
    let (result, ()) = tokio::join!(cursor.pull(), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    // Assert
    assert_eq!(result?, None);
    assert_eq!(stats.closes(), 1);
    assert_eq!(stats.live(), 0);
    Ok(())
}

#[tokio::test]
async fn test_take_until_sequence_trigger_closes_both() -> anyhow::Result<()> {
    // Arrange
    let (values_tx, values) = test_channel::<u32>();
    let (stop_tx, stop) = test_channel::<&'static str>();
    let (values, value_stats) = probe(values);
    let (stop, stop_stats) = probe(stop);
    let mut cursor = values.take_until(Trigger::sequence(stop)).open();

    // Act
    values_tx.send(1)?;
    let first = unwrap_pull(&mut cursor, 500).await;
    stop_tx.send("halt")?;

    // Assert
    assert_eq!(first, 1);
    assert_completed(&mut cursor).await;
    assert_eq!(value_stats.closes(), 1);
    assert_eq!(stop_stats.opens(), 1);
    // The trigger cursor fired and was closed once
    assert_eq!(stop_stats.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn test_take_until_trigger_completing_without_value_disarms() -> anyhow::Result<()> {
    // Arrange
    let source = iter(vec![1, 2, 3]).take_until(Trigger::sequence(empty::<()>()));

    // Act & Assert
    assert_eq!(source.collect().await?, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_take_until_resolved_future_completes_immediately() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(counter());
    let done = source.take_until(Trigger::future(async { Ok(()) }));

    // Act
    let values = done.collect().await?;

    // Assert
    assert!(values.is_empty());
    assert_eq!(stats.pulls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_take_until_pending_future_never_fires() -> anyhow::Result<()> {
    // Arrange
    let source = iter(1..=4).take_until(Trigger::future(futures::future::pending()));

    // Act & Assert
    assert_eq!(source.collect().await?, vec![1, 2, 3, 4]);
    Ok(())
}

#[tokio::test]
async fn test_take_until_callback_invoked_once_per_cursor() -> anyhow::Result<()> {
    // Arrange
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter_ref = Arc::clone(&invocations);
    let source = iter(1..=3).take_until(Trigger::callback(move || {
        counter_ref.fetch_add(1, Ordering::SeqCst);
        futures::future::pending::<sluice_core::Result<()>>()
    }));

    // Act
    let unopened = source.open();
    let first = source.collect().await?;
    let second = source.collect().await?;
    drop(unopened);

    // Assert
    assert_eq!(first, vec![1, 2, 3]);
    assert_eq!(second, vec![1, 2, 3]);
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_take_until_close_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let (source, stats) = probe(counter());
    let mut cursor = source.take_until(token).open();
    assert_eq!(cursor.pull().await?, Some(0));

    // Act
    cursor.close().await?;
    cursor.close().await?;

    // Assert
    assert_eq!(stats.closes(), 1);
    assert_eq!(stats.live(), 0);
    assert_completed(&mut cursor).await;
    Ok(())
}
