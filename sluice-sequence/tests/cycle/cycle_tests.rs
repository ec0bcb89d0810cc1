// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `cycle`.

use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::{probe, tick_btc, tick_eth};

#[tokio::test]
async fn test_cycle_replays_from_the_start() -> anyhow::Result<()> {
    // Arrange
    let rotation = iter(vec![tick_btc(1), tick_eth(2)]).cycle().take(5);

    // Act
    let values = rotation.collect().await?;

    // Assert
    assert_eq!(
        values,
        vec![tick_btc(1), tick_eth(2), tick_btc(1), tick_eth(2), tick_btc(1)]
    );
    Ok(())
}

#[tokio::test]
async fn test_cycle_opens_a_fresh_cursor_per_round() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(iter(vec![1, 2]));

    // Act
    let values = source.cycle().take(5).collect().await?;

    // Assert
    assert_eq!(values, vec![1, 2, 1, 2, 1]);
    assert_eq!(stats.opens(), 3);
    // Only the third round was cut short
    assert_eq!(stats.closes(), 1);
    assert_eq!(stats.max_live(), 1);
    Ok(())
}

#[tokio::test]
async fn test_cycle_of_empty_source_completes() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(iter(Vec::<u32>::new()));

    // Act
    let values = source.cycle().collect().await?;

    // Assert
    assert!(values.is_empty());
    assert_eq!(stats.opens(), 1);
    Ok(())
}
