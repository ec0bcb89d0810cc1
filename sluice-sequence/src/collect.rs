// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Terminal collectors that drive a fresh cursor to a single result.

use async_trait::async_trait;
use sluice_core::{Cursor, Result, Sequence};

/// Extension trait providing the collectors.
#[async_trait]
pub trait CollectExt: Sequence + Sized {
    /// Pull every value of a fresh cursor into a `Vec`.
    ///
    /// On failure the error is returned and the values pulled so far are discarded;
    /// a partial result is never produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_sequence::prelude::*;
    /// use sluice_sequence::iter;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> sluice_core::Result<()> {
    /// assert_eq!(iter(1..=3).collect().await?, vec![1, 2, 3]);
    /// # Ok(())
    /// # }
    /// ```
    async fn collect(&self) -> Result<Vec<Self::Item>>;

    /// Pull a single value from a fresh cursor, then close it.
    ///
    /// Returns `Ok(None)` for an empty sequence. The cursor is closed whatever the
    /// outcome of the pull.
    async fn take_first(&self) -> Result<Option<Self::Item>>;
}

#[async_trait]
impl<S: Sequence> CollectExt for S {
    async fn collect(&self) -> Result<Vec<S::Item>> {
        let mut cursor = self.open();
        let mut values = Vec::new();
        loop {
            match cursor.pull().await {
                Ok(Some(value)) => values.push(value),
                Ok(None) => return Ok(values),
                Err(error) => {
                    if let Err(close_error) = cursor.close().await {
                        warn!("collect: closing cursor after failure: {close_error}");
                    }
                    return Err(error);
                }
            }
        }
    }

    async fn take_first(&self) -> Result<Option<S::Item>> {
        let mut cursor = self.open();
        match cursor.pull().await {
            Ok(first) => {
                cursor.close().await?;
                Ok(first)
            }
            Err(error) => {
                if let Err(close_error) = cursor.close().await {
                    warn!("take_first: closing cursor after failure: {close_error}");
                }
                Err(error)
            }
        }
    }
}
