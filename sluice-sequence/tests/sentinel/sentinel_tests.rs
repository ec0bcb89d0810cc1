// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for the `empty` and `hanging` sentinels.

use sluice_sequence::prelude::*;
use sluice_sequence::{empty, hanging};
use sluice_test_utils::{assert_completed, assert_no_element_emitted};

#[tokio::test]
async fn test_empty_completes_immediately() -> anyhow::Result<()> {
    // Arrange
    let mut cursor = empty::<u32>().open();

    // Act & Assert
    assert_completed(&mut cursor).await;
    assert_completed(&mut cursor).await;
    cursor.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_hanging_never_yields_until_closed() -> anyhow::Result<()> {
    // Arrange
    let mut cursor = hanging::<u32>().open();

    // Act
    assert_no_element_emitted(&mut cursor, 50).await;
    cursor.close().await?;

    // Assert
    assert_completed(&mut cursor).await;
    Ok(())
}
