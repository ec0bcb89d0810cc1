// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Collect-all joining of concurrent close operations.

use crate::{Result, SluiceError};
use futures::future::join_all;
use std::future::Future;

/// Run every close concurrently and report all failures.
///
/// Every future is driven to completion, even when an earlier one fails, so a failing or
/// slow source never prevents cleanup of its siblings. The result is `Ok(())` when all
/// succeed, the error itself when exactly one fails, and
/// [`SluiceError::MultipleErrors`] when several fail.
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use sluice_core::{close_all, SluiceError};
///
/// # #[tokio::main]
/// # async fn main() {
/// let result = close_all(vec![
///     async { Ok(()) }.boxed(),
///     async { Err(SluiceError::stream_error("socket reset")) }.boxed(),
///     async { Err(SluiceError::stream_error("redis gone")) }.boxed(),
/// ])
/// .await;
///
/// assert!(matches!(result, Err(SluiceError::MultipleErrors { count: 2, .. })));
/// # }
/// ```
pub async fn close_all<I, F>(closes: I) -> Result<()>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<()>>,
{
    let errors: Vec<SluiceError> = join_all(closes)
        .await
        .into_iter()
        .filter_map(|result| result.err())
        .collect();

    match SluiceError::from_errors(errors) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
