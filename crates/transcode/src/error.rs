//! Transcode Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A transcode error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transcode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("ffmpeg not detected on your system")]
    FfmpegNotFound,
    #[display("source file not found: {}", _0.display())]
    SourceNotFound(#[error(not(source))] PathBuf),
    /// ffmpeg exited with a non-zero exit code.
    #[display("ffmpeg exited with code: {_0}")]
    Failed(#[error(not(source))] i32),
    /// ffmpeg was killed by a signal before finishing.
    #[display("ffmpeg was terminated before finishing")]
    Terminated,
    #[display("I/O error while running ffmpeg")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Terminated | Self::Io)
    }
}
