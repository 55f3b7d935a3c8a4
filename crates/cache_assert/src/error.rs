// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache capability calls.

/// An error raised by a cache mutator or accessor.
///
/// Assertion helpers never construct this type themselves: it only ever
/// carries a failure reported by the cache under test, and it reaches the
/// caller exactly as the capability returned it.
///
/// # Example
///
/// ```
/// use cache_assert::Error;
///
/// let error = Error::from_message("backing store unreachable");
/// assert!(error.to_string().contains("unreachable"));
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// Capability implementations use this to surface backend failures.
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for cache capability calls.
pub type Result<T> = std::result::Result<T, Error>;
