//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Variants name the subsystem that
//! failed; the underlying storage, chat or transcoding error is kept as the
//! child of the raised error.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a pipeline failure.
///
/// ### Fatal Errors
/// - [`ErrorKind::SourceNotFound`]
///
/// ### Per-item Errors
/// - [`ErrorKind::Source`]
/// - [`ErrorKind::Transcode`]
/// - [`ErrorKind::Storage`]
/// - [`ErrorKind::Remote`]
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The backup directory or chat group to archive from doesn't exist.
    #[display("source not found: {_0}")]
    SourceNotFound(#[error(not(source))] String),
    /// Reading from the item source (directory entry, media download) failed.
    #[display("unable to read from source")]
    Source,
    /// The transcoding collaborator failed to normalize an audio item.
    #[display("transcoding failed")]
    Transcode,
    /// A local archive directory operation failed.
    #[display("local archive operation failed")]
    Storage,
    /// Remote folder resolution or upload failed.
    #[display("remote operation failed")]
    Remote,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Source | Self::Remote)
    }
}
