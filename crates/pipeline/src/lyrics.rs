//! Lyrics export.
//!
//! Song lyrics shared in the group are recovered from the backup's chat
//! transcript with [`extract_segments`] and archived together as a single
//! text file under the "Letras" folder.

use crate::archive::{Archiver, UploadResult};
use crate::classify::Classification;
use crate::error::{ErrorKind, Result};
use crate::item::{Content, MediaItem, SourceRef};
use crate::segments::{TextSegment, extract_segments};
use exn::ResultExt;
use std::path::Path;
use tokio::fs;
use tracing::instrument;

/// Separates segments in the exported file.
const SEGMENT_SEPARATOR: &str = "\n\n";

/// Extract lyrics from `chat_file` and archive them. Returns `None` when the
/// transcript holds no lyrics.
#[instrument(skip_all, fields(chat_file = %chat_file.display()))]
pub async fn export_lyrics<K: AsRef<str>>(
    archiver: &Archiver,
    chat_file: &Path,
    keywords: &[K],
) -> Result<Option<UploadResult>> {
    let transcript = match fs::read_to_string(chat_file).await {
        Ok(transcript) => transcript,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            exn::bail!(ErrorKind::SourceNotFound(chat_file.display().to_string()))
        },
        Err(e) => return Err(e).or_raise(|| ErrorKind::Source),
    };

    // A trailing newline yields a final empty line, closing the last segment.
    let lines = transcript.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let segments = extract_segments(lines, keywords);
    if segments.is_empty() {
        tracing::info!("No lyrics found in chat transcript");
        return Ok(None);
    }
    tracing::info!(segments = segments.len(), "Found lyrics in chat transcript");

    let text = segments.iter().map(TextSegment::as_str).collect::<Vec<_>>().join(SEGMENT_SEPARATOR);
    let item = MediaItem {
        source: SourceRef::Lyrics(chat_file.to_path_buf()),
        content: Content::Bytes(text.into_bytes()),
        file_name: Some("lyrics.txt".to_string()),
        mime_type: Some("text/plain".to_string()),
    };
    archiver.archive_as(item, Classification::Text).await.map(Some)
}
