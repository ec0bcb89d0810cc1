// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for sluice sequence operators
//!
//! A single [`SluiceError`] travels through every cursor in a pipeline. Upstream
//! failures, failures of user-supplied functions and aggregated cleanup failures all
//! surface as variants of it, so a consumer at the end of a chain handles one type.
//!
//! # Examples
//!
//! ```
//! use sluice_core::{SluiceError, Result};
//!
//! fn read_tick() -> Result<u64> {
//!     Err(SluiceError::stream_error("price feed disconnected"))
//! }
//!
//! assert!(read_tick().is_err());
//! ```

use std::sync::Arc;

/// Root error type for all sluice operations
///
/// The type is `Clone` so that a single upstream failure can be delivered to every
/// subscriber of a shared sequence.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SluiceError {
    /// A producer or upstream cursor failed
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps failures of user-provided transforms, predicates and side effects.
    #[error("User error: {0}")]
    UserError(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// Several errors occurred together
    ///
    /// Produced when closing several upstream cursors fails on more than one of them,
    /// or when a subscriber collects handler failures.
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors
        errors: Vec<SluiceError>,
    },

    /// A producer-side channel went away
    #[error("Channel closed: {context}")]
    ChannelClosed {
        /// Which channel and why
        context: String,
    },
}

impl SluiceError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a channel closed error with the given context
    pub fn channel_closed(context: impl Into<String>) -> Self {
        Self::ChannelClosed {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Arc::new(error))
    }

    /// Aggregate multiple user errors into a `MultipleErrors` variant
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_core::SluiceError;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("handler failed: {0}")]
    /// struct HandlerError(u32);
    ///
    /// let result = SluiceError::from_user_errors(vec![HandlerError(1), HandlerError(2)]);
    /// assert!(matches!(result, SluiceError::MultipleErrors { count: 2, .. }));
    /// ```
    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::from_errors(errors.into_iter().map(Self::user_error).collect())
            .unwrap_or_else(|| Self::MultipleErrors {
                count: 0,
                errors: Vec::new(),
            })
    }

    /// Collapse a list of errors into one
    ///
    /// Returns `None` for an empty list, the error itself for a single entry and
    /// `MultipleErrors` otherwise.
    pub fn from_errors(mut errors: Vec<SluiceError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            count => Some(Self::MultipleErrors { count, errors }),
        }
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::StreamProcessingError { .. } | Self::UserError(_)
        )
    }
}

/// Specialized Result type for sluice operations
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Extension trait for converting errors into `SluiceError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`, so user
/// functions can map their own failures with `.map_err(IntoSluiceError::into_sluice)`.
pub trait IntoSluiceError {
    /// Convert this error into a `SluiceError` with additional context
    fn into_sluice_error(self, context: &str) -> SluiceError;

    /// Convert this error into a `SluiceError` without additional context
    fn into_sluice(self) -> SluiceError
    where
        Self: Sized,
    {
        self.into_sluice_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoSluiceError for E {
    fn into_sluice_error(self, context: &str) -> SluiceError {
        if context.is_empty() {
            SluiceError::user_error(self)
        } else {
            SluiceError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(SluiceError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(SluiceError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SluiceError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| attach(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| attach(e.into(), f()))
    }
}

fn attach(error: SluiceError, context: String) -> SluiceError {
    match error {
        SluiceError::UserError(inner) => SluiceError::StreamProcessingError {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}
