// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Basic tests for `tap` and `tap_async`.

use parking_lot::Mutex;
use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::{tick_btc, tick_eth, PriceTick};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_tap_observes_without_changing_values() -> anyhow::Result<()> {
    // Arrange
    let seen = Arc::new(Mutex::new(Vec::new()));
    let observer = Arc::clone(&seen);
    let source = iter(vec![tick_btc(1), tick_eth(2)])
        .tap(move |tick: &PriceTick| observer.lock().push(tick.symbol.clone()));

    // Act
    let values = source.collect().await?;

    // Assert
    assert_eq!(values, vec![tick_btc(1), tick_eth(2)]);
    assert_eq!(*seen.lock(), vec!["BTC".to_string(), "ETH".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_tap_runs_once_per_pulled_value() -> anyhow::Result<()> {
    // Arrange
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut cursor = iter(1..=100)
        .tap(move |_: &i32| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .open();

    // Act
    cursor.pull().await?;
    cursor.pull().await?;
    cursor.close().await?;

    // Assert
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_tap_async_completes_side_effect_before_yielding() -> anyhow::Result<()> {
    // Arrange
    let events = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&events);
    let mut cursor = iter(vec![1, 2])
        .tap_async(move |v: &i32| {
            let log = Arc::clone(&log);
            let v = *v;
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                log.lock().push(format!("effect:{v}"));
                Ok(())
            }
        })
        .open();

    // Act
    while let Some(v) = cursor.pull().await? {
        events.lock().push(format!("value:{v}"));
    }

    // Assert
    assert_eq!(
        *events.lock(),
        vec!["effect:1", "value:1", "effect:2", "value:2"]
    );
    Ok(())
}
