// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error handling tests for `catch`.

use sluice_core::BoxSequence;
use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::{assert_completed, counter, probe, ErrorInjectingSequence};

#[tokio::test]
async fn test_catch_declining_handler_rethrows() -> anyhow::Result<()> {
    // Arrange
    let source = ErrorInjectingSequence::new(counter(), 0);
    let mut cursor = source
        .catch(|_, _| Option::<BoxSequence<u64>>::None)
        .open();

    // Act
    let result = cursor.pull().await;

    // Assert
    assert!(matches!(
        result,
        Err(SluiceError::StreamProcessingError { ref context }) if context == "Injected test error"
    ));
    assert_completed(&mut cursor).await;
    Ok(())
}

#[tokio::test]
async fn test_catch_fallback_failure_propagates() -> anyhow::Result<()> {
    // Arrange
    let primary = ErrorInjectingSequence::new(counter(), 1);
    let (fallback, fallback_stats) = probe(ErrorInjectingSequence::new(iter(vec![7_u64, 8]), 1));
    let fallback = fallback.boxed();
    let recovered = primary.catch(move |_, _| Some(fallback.clone()));

    // Act
    let result = recovered.collect().await;

    // Assert
    assert!(result.is_err());
    assert_eq!(fallback_stats.opens(), 1);
    assert_eq!(fallback_stats.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn test_catch_close_reaches_active_fallback() -> anyhow::Result<()> {
    // Arrange
    let primary = ErrorInjectingSequence::new(counter(), 0);
    let (fallback, fallback_stats) = probe(counter());
    let fallback = fallback.boxed();
    let mut cursor = primary.catch(move |_, _| Some(fallback.clone())).open();

    // Act
    assert_eq!(cursor.pull().await?, Some(0));
    cursor.close().await?;
    cursor.close().await?;

    // Assert
    assert_eq!(fallback_stats.closes(), 1);
    Ok(())
}
