// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `combine_latest`.

use sluice_sequence::prelude::*;
use sluice_sequence::{combine_latest, iter};
use sluice_test_utils::{
    assert_completed, assert_no_element_emitted, probe, test_channel, tick_btc, tick_eth,
    unwrap_pull,
};

#[tokio::test]
async fn test_combine_latest_emits_after_every_source_produced() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, a) = test_channel();
    let (tx_b, b) = test_channel();
    let mut cursor = combine_latest(vec![a, b]).open();

    // Act & Assert
    tx_a.send(1)?;
    assert_no_element_emitted(&mut cursor, 50).await;

    tx_b.send(10)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await.into_inner(), vec![1, 10]);

    tx_a.send(2)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await.into_inner(), vec![2, 10]);
    Ok(())
}

#[tokio::test]
async fn test_combine_latest_keeps_completed_source_value() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, a) = test_channel();
    let (tx_b, b) = test_channel();
    let mut cursor = combine_latest(vec![a, b]).open();
    tx_a.send(1)?;
    tx_b.send(10)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await.into_inner(), vec![1, 10]);
    tx_a.send(2)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await.into_inner(), vec![2, 10]);

    // Act
    tx_a.close();

    // Assert
    assert_no_element_emitted(&mut cursor, 50).await;
    tx_b.send(11)?;
    assert_eq!(unwrap_pull(&mut cursor, 500).await.into_inner(), vec![2, 11]);
    tx_b.close();
    assert_completed(&mut cursor).await;
    Ok(())
}

#[tokio::test]
async fn test_combine_latest_silent_when_a_source_never_yields() -> anyhow::Result<()> {
    // Arrange
    let (tx, live) = test_channel::<u32>();
    let source = iter(vec![1_u32, 2]).combine_latest_with(vec![live.boxed()]);
    let mut cursor = source.open();

    // Act
    tx.close();

    // Assert
    assert_completed(&mut cursor).await;
    Ok(())
}

#[tokio::test]
async fn test_combine_latest_snapshot_order_follows_sources() -> anyhow::Result<()> {
    // Arrange
    let (tx_eth, eth) = test_channel();
    let btc = iter(vec![tick_btc(60_000)]);
    let mut cursor = btc.combine_latest_with(vec![eth.boxed()]).open();

    // Act
    tx_eth.send(tick_eth(3_000))?;
    let state = unwrap_pull(&mut cursor, 500).await;

    // Assert
    assert_eq!(state.get_state(), &vec![tick_btc(60_000), tick_eth(3_000)]);
    cursor.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_combine_latest_close_reaches_every_source() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, a) = test_channel::<u32>();
    let (tx_b, b) = test_channel::<u32>();
    let (a, a_stats) = probe(a);
    let (b, b_stats) = probe(b);
    let mut cursor = combine_latest(vec![a.boxed(), b.boxed()]).open();
    tx_a.send(1)?;
    tx_b.send(2)?;
    unwrap_pull(&mut cursor, 500).await;

    // Act
    cursor.close().await?;

    // Assert
    assert_eq!(a_stats.closes(), 1);
    assert_eq!(b_stats.closes(), 1);
    assert_eq!(a_stats.live() + b_stats.live(), 0);
    Ok(())
}

#[tokio::test]
async fn test_combine_latest_close_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, a) = test_channel::<u32>();
    let (tx_b, b) = test_channel::<u32>();
    let (a, a_stats) = probe(a);
    let (b, b_stats) = probe(b);
    let mut cursor = combine_latest(vec![a.boxed(), b.boxed()]).open();
    tx_a.send(1)?;
    tx_b.send(2)?;
    unwrap_pull(&mut cursor, 500).await;

    // Act
    cursor.close().await?;
    cursor.close().await?;

    // Assert
    assert_eq!(a_stats.closes(), 1);
    assert_eq!(b_stats.closes(), 1);
    assert_completed(&mut cursor).await;
    Ok(())
}
