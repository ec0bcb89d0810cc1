// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `map`, `try_map` and `map_async`.

use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::{test_channel, tick_btc, tick_eth, unwrap_pull, PriceTick};
use std::time::Duration;

#[tokio::test]
async fn test_map_transforms_every_value() -> anyhow::Result<()> {
    // Arrange
    let ticks = iter(vec![tick_btc(100), tick_eth(20), tick_btc(101)]);

    // Act
    let prices = ticks.map(|tick: PriceTick| tick.price).collect().await?;

    // Assert
    assert_eq!(prices, vec![100, 20, 101]);
    Ok(())
}

#[tokio::test]
async fn test_map_empty_source_completes() -> anyhow::Result<()> {
    // Arrange
    let source = iter(Vec::<u64>::new()).map(|v| v * 2);

    // Act & Assert
    assert!(source.collect().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_map_pulls_lazily_from_live_source() -> anyhow::Result<()> {
    // Arrange
    let (tx, channel) = test_channel();
    let mut cursor = channel.map(|tick: PriceTick| tick.symbol).open();

    // Act
    tx.send(tick_eth(3000))?;
    let first = unwrap_pull(&mut cursor, 500).await;
    tx.send(tick_btc(60000))?;
    let second = unwrap_pull(&mut cursor, 500).await;

    // Assert
    assert_eq!(first, "ETH");
    assert_eq!(second, "BTC");
    Ok(())
}

#[tokio::test]
async fn test_try_map_passes_successful_values() -> anyhow::Result<()> {
    // Arrange
    let source = iter(vec!["1", "2", "3"]).try_map(|raw: &str| {
        raw.parse::<u32>()
            .map_err(|e| SluiceError::stream_error(e.to_string()))
    });

    // Act & Assert
    assert_eq!(source.collect().await?, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_map_async_awaits_each_transform_in_order() -> anyhow::Result<()> {
    // Arrange
    let source = iter(vec![30_u64, 10, 20]).map_async(|delay| async move {
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(delay / 10)
    });

    // Act
    let values = source.collect().await?;

    // Assert
    assert_eq!(values, vec![3, 1, 2]);
    Ok(())
}
