// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error handling tests for `cycle`.

use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::{assert_completed, probe, ErrorInjectingSequence};

#[tokio::test]
async fn test_cycle_stops_on_failure() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(ErrorInjectingSequence::new(iter(vec![1, 2, 3]), 2));
    let mut cursor = source.cycle().open();

    // Act
    let first = cursor.pull().await?;
    let second = cursor.pull().await?;
    let third = cursor.pull().await;

    // Assert
    assert_eq!(first, Some(1));
    assert_eq!(second, Some(2));
    assert!(third.is_err());
    assert_completed(&mut cursor).await;
    assert_eq!(stats.opens(), 1);
    Ok(())
}
