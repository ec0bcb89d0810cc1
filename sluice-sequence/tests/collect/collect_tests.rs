// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `collect` and `take_first`.

use sluice_sequence::prelude::*;
use sluice_sequence::{empty, iter};
use sluice_test_utils::{counter, probe, tick_btc, tick_eth};

#[tokio::test]
async fn test_collect_gathers_values_in_order() -> anyhow::Result<()> {
    // Arrange
    let source = iter(vec![tick_btc(1), tick_eth(2), tick_btc(3)]);

    // Act
    let values = source.collect().await?;

    // Assert
    assert_eq!(values, vec![tick_btc(1), tick_eth(2), tick_btc(3)]);
    Ok(())
}

#[tokio::test]
async fn test_collect_empty_sequence() -> anyhow::Result<()> {
    // Arrange
    let source = empty::<u32>();

    // Act & Assert
    assert!(source.collect().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_take_first_closes_the_cursor() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(counter());

    // Act
    let first = source.take_first().await?;

    // Assert
    assert_eq!(first, Some(0));
    assert_eq!(stats.pulls(), 1);
    assert_eq!(stats.closes(), 1);
    assert_eq!(stats.live(), 0);
    Ok(())
}

#[tokio::test]
async fn test_take_first_of_empty_sequence() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(empty::<u32>());

    // Act
    let first = source.take_first().await?;

    // Assert
    assert_eq!(first, None);
    assert_eq!(stats.opens(), 1);
    Ok(())
}

#[tokio::test]
async fn test_collect_opens_a_fresh_cursor_each_time() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(iter(vec![1, 2, 3]));

    // Act
    let first = source.collect().await?;
    let second = source.collect().await?;

    // Assert
    assert_eq!(first, second);
    assert_eq!(stats.opens(), 2);
    Ok(())
}
