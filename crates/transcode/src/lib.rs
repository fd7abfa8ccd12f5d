//! Audio transcoding.
//!
//! The archive normalizes voice notes (Opus) into a single target format
//! before storing them. The work itself is done by an external `ffmpeg`
//! binary; from the caller's point of view a transcode is one awaited
//! operation that either succeeds or returns an error.

pub mod error;
mod ffmpeg;

pub use crate::ffmpeg::Ffmpeg;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub type TranscoderHandle = Arc<dyn Transcoder + Send + Sync>;

/// Audio formats the archive can normalize into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// MPEG-1 Audio Layer III
    #[default]
    Mp3,
}
impl AudioFormat {
    /// File extension (without the leading dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
        }
    }

    /// Name of the ffmpeg muxer producing this format.
    pub fn muxer(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
        }
    }
}

/// Converts an audio file from one encoding into another.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Read `source`, write `target` in `format`. An existing `target` is
    /// overwritten. Resolves only once the output is complete.
    async fn transcode(&self, source: &Path, target: &Path, format: AudioFormat) -> Result<()>;
}
