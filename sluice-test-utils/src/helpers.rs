// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Assertion helpers that pull with a timeout.

use sluice_core::Cursor;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Pull the next value, panicking on timeout, completion or failure.
pub async fn unwrap_pull<C>(cursor: &mut C, timeout_ms: u64) -> C::Item
where
    C: Cursor,
{
    match timeout(Duration::from_millis(timeout_ms), cursor.pull()).await {
        Ok(Ok(Some(value))) => value,
        Ok(Ok(None)) => panic!("Expected a value, but the cursor completed"),
        Ok(Err(error)) => panic!("Expected a value, but the pull failed: {error}"),
        Err(_) => panic!("Timeout: no value within {timeout_ms}ms"),
    }
}

/// Assert that a pull does not resolve within `timeout_ms`.
///
/// The pending pull is dropped afterwards; the cursor should only be closed after
/// this assertion.
pub async fn assert_no_element_emitted<C>(cursor: &mut C, timeout_ms: u64)
where
    C: Cursor,
    C::Item: Debug,
{
    tokio::select! {
        result = cursor.pull() => {
            panic!("Unexpected emission, expected no output: {result:?}");
        }
        () = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Assert that the cursor completes on its next pull.
pub async fn assert_completed<C>(cursor: &mut C)
where
    C: Cursor,
    C::Item: Debug,
{
    match cursor.pull().await {
        Ok(None) => {}
        other => panic!("Expected completion, got {other:?}"),
    }
}
