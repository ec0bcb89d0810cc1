// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error handling tests for `merge`.

use sluice_sequence::prelude::*;
use sluice_sequence::{hanging, merge};
use sluice_test_utils::{
    assert_completed, counter, probe, CloseFailingSequence, ErrorInjectingSequence,
};

#[tokio::test]
async fn test_merge_failure_closes_other_sources() -> anyhow::Result<()> {
    // Arrange
    let (quiet, quiet_stats) = probe(hanging::<u64>());
    let failing = ErrorInjectingSequence::new(counter(), 1);
    let mut cursor = merge(vec![quiet.boxed(), failing.boxed()]).open();

    // Act
    let first = cursor.pull().await?;
    let second = cursor.pull().await;

    // Assert
    assert_eq!(first, Some(0));
    assert!(matches!(
        second,
        Err(SluiceError::StreamProcessingError { ref context }) if context == "Injected test error"
    ));
    assert_eq!(quiet_stats.closes(), 1);
    assert_eq!(quiet_stats.live(), 0);
    assert_completed(&mut cursor).await;
    Ok(())
}

#[tokio::test]
async fn test_merge_close_collects_every_close_failure() -> anyhow::Result<()> {
    // Arrange
    let first = CloseFailingSequence::new(hanging::<u32>(), "first close failed");
    let second = CloseFailingSequence::new(hanging::<u32>(), "second close failed");
    let (third, third_stats) = probe(hanging::<u32>());
    let mut cursor = merge(vec![first.boxed(), second.boxed(), third.boxed()]).open();
    sluice_test_utils::assert_no_element_emitted(&mut cursor, 20).await;

    // Act
    let result = cursor.close().await;

    // Assert
    assert!(matches!(
        result,
        Err(SluiceError::MultipleErrors { count: 2, .. })
    ));
    // A failing close does not prevent the others
    assert_eq!(third_stats.closes(), 1);
    Ok(())
}
