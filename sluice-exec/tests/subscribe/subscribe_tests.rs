// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_core::CancellationToken;
use sluice_exec::SubscribeExt;
use sluice_sequence::iter;
use sluice_sequence::prelude::*;
use sluice_test_utils::test_data::{tick_btc, tick_eth, tick_sol};
use sluice_test_utils::{counter, probe, test_channel, PriceTick};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[tokio::test]
async fn test_subscribe_handles_values_in_order() -> anyhow::Result<()> {
    // Arrange
    let received = Arc::new(Mutex::new(Vec::<PriceTick>::new()));
    let ticks = iter(vec![tick_btc(101), tick_eth(55), tick_sol(20)]);

    // Act
    ticks
        .subscribe(
            {
                let received = Arc::clone(&received);
                move |tick, _token: CancellationToken| {
                    let received = Arc::clone(&received);
                    async move {
                        received.lock().unwrap().push(tick);
                        Ok::<(), Infallible>(())
                    }
                }
            },
            None,
            None::<fn(Infallible)>,
        )
        .await?;

    // Assert
    assert_eq!(
        *received.lock().unwrap(),
        vec![tick_btc(101), tick_eth(55), tick_sol(20)]
    );
    Ok(())
}

#[tokio::test]
async fn test_subscribe_finishes_handler_before_next_pull() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(iter(vec![1, 2, 3]));
    let pulls_seen = Arc::new(Mutex::new(Vec::new()));

    // Act
    source
        .subscribe(
            {
                let pulls_seen = Arc::clone(&pulls_seen);
                let stats = stats.clone();
                move |_value: i32, _token: CancellationToken| {
                    let pulls_seen = Arc::clone(&pulls_seen);
                    let pulls = stats.pulls();
                    async move {
                        tokio::task::yield_now().await;
                        pulls_seen.lock().unwrap().push(pulls);
                        Ok::<(), Infallible>(())
                    }
                }
            },
            None,
            None::<fn(Infallible)>,
        )
        .await?;

    // Assert
    assert_eq!(*pulls_seen.lock().unwrap(), vec![1, 2, 3]);
    // The final pull observed completion
    assert_eq!(stats.pulls(), 4);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_cancellation_closes_cursor() -> anyhow::Result<()> {
    // Arrange
    let (tx, channel) = test_channel::<u32>();
    let (source, stats) = probe(channel);
    let token = CancellationToken::new();
    let (handled_tx, mut handled_rx) = mpsc::unbounded_channel();

    let subscription = tokio::spawn({
        let token = token.clone();
        async move {
            source
                .subscribe(
                    move |value, _token: CancellationToken| {
                        let handled_tx = handled_tx.clone();
                        async move {
                            let _ = handled_tx.send(value);
                            Ok::<(), Infallible>(())
                        }
                    },
                    Some(token),
                    None::<fn(Infallible)>,
                )
                .await
        }
    });

    // Act
    tx.send(7)?;
    let handled = handled_rx.recv().await;
    token.cancel();
    let result = subscription.await?;

    // Assert
    assert_eq!(handled, Some(7));
    assert!(result.is_ok());
    assert_eq!(stats.closes(), 1);
    assert_eq!(stats.live(), 0);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_with_cancelled_token_never_pulls() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(counter());
    let token = CancellationToken::new();
    token.cancel();
    let calls = Arc::new(Mutex::new(0));

    // Act
    source
        .subscribe(
            {
                let calls = Arc::clone(&calls);
                move |_value: u64, _token: CancellationToken| {
                    *calls.lock().unwrap() += 1;
                    async { Ok::<(), Infallible>(()) }
                }
            },
            Some(token),
            None::<fn(Infallible)>,
        )
        .await?;

    // Assert
    assert_eq!(*calls.lock().unwrap(), 0);
    assert_eq!(stats.pulls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_handler_observes_cancellation() -> anyhow::Result<()> {
    // Arrange
    let token = CancellationToken::new();
    let observed = Arc::new(Mutex::new(Vec::new()));

    // Act
    counter()
        .subscribe(
            {
                let token = token.clone();
                let observed = Arc::clone(&observed);
                move |value: u64, handler_token: CancellationToken| {
                    let token = token.clone();
                    let observed = Arc::clone(&observed);
                    async move {
                        if value == 2 {
                            token.cancel();
                        }
                        observed
                            .lock()
                            .unwrap()
                            .push((value, handler_token.is_cancelled()));
                        Ok::<(), Infallible>(())
                    }
                }
            },
            Some(token.clone()),
            None::<fn(Infallible)>,
        )
        .await?;

    // Assert
    assert_eq!(
        *observed.lock().unwrap(),
        vec![(0, false), (1, false), (2, true)]
    );
    Ok(())
}

#[tokio::test]
async fn test_subscribe_drives_operator_chain() -> anyhow::Result<()> {
    // Arrange
    let (source, stats) = probe(counter());
    let chain = source.filter(|value| value % 2 == 0).take(3);
    let received = Arc::new(Mutex::new(Vec::new()));

    // Act
    chain
        .subscribe(
            {
                let received = Arc::clone(&received);
                move |value: u64, _token: CancellationToken| {
                    received.lock().unwrap().push(value);
                    async { Ok::<(), Infallible>(()) }
                }
            },
            None,
            None::<fn(Infallible)>,
        )
        .await?;

    // Assert
    assert_eq!(*received.lock().unwrap(), vec![0, 2, 4]);
    assert_eq!(stats.closes(), 1);
    Ok(())
}
