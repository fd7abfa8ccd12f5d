//! Chat Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A chat source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for chat source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The operator never completed the login challenge, or it was rejected.
    #[display("authentication failed: {_0}")]
    Authentication(#[error(not(source))] String),
    /// The session dropped while talking to the chat service.
    #[display("session disconnected")]
    Disconnected,
    /// A page of history could not be fetched.
    #[display("unable to fetch messages: {_0}")]
    Fetch(#[error(not(source))] String),
    /// A message's media payload could not be downloaded.
    #[display("unable to download media for message {_0}")]
    Download(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Fetch(_) | Self::Download(_))
    }
}
