// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error handling tests for `take`.

use sluice_sequence::prelude::*;
use sluice_test_utils::{counter, probe, CloseFailingSequence, ErrorInjectingSequence};

#[tokio::test]
async fn test_take_propagates_error_before_limit() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(ErrorInjectingSequence::new(counter(), 1));

    // Act
    let result = source.take(5).collect().await;

    // Assert
    assert!(result.is_err());
    assert_eq!(stats.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn test_take_reports_close_failure_at_limit() -> anyhow::Result<()> {
    // Arrange
    let source = CloseFailingSequence::new(counter(), "disconnect failed");
    let mut cursor = source.take(1).open();

    // Act
    let result = cursor.pull().await;

    // Assert
    assert!(matches!(
        result,
        Err(SluiceError::StreamProcessingError { ref context }) if context == "disconnect failed"
    ));
    Ok(())
}
