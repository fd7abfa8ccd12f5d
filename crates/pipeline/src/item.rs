use derive_more::Display;
use hoard_chat::{Media, MessageId};
use std::path::{Path, PathBuf};

/// Extensions for the media types chats send, where the registry's first
/// choice is an obscure alias (`image/jpeg` lists `jfif` first).
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("audio/mp4", "m4a"),
    ("audio/mpeg", "mp3"),
    ("audio/ogg", "opus"),
    ("image/jpeg", "jpeg"),
    ("video/mp4", "mp4"),
];

/// Where an item came from. Used in logs and reported back in results.
#[derive(Debug, Clone, Display, PartialEq, Eq)]
pub enum SourceRef {
    #[display("{}", _0.display())]
    File(PathBuf),
    #[display("message {_0}")]
    Message(MessageId),
    #[display("lyrics from {}", _0.display())]
    Lyrics(PathBuf),
}

/// An item's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A file on disk, copied (or transcoded) into the archive.
    File(PathBuf),
    /// Bytes already in memory, written into the archive.
    Bytes(Vec<u8>),
}

/// One thing to archive.
///
/// Items are produced by an enumerator and consumed once by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub source: SourceRef,
    pub content: Content,
    /// Original file name, when known
    pub file_name: Option<String>,
    /// MIME type declared by the source, when known
    pub mime_type: Option<String>,
}

impl MediaItem {
    /// An item for a file in a backup directory. Classified by extension only.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Self { source: SourceRef::File(path.clone()), content: Content::File(path), file_name, mime_type: None }
    }

    /// An item for media downloaded from a chat message.
    pub fn from_media(message: MessageId, media: Media) -> Self {
        Self {
            source: SourceRef::Message(message),
            content: Content::Bytes(media.data),
            file_name: media.file_name,
            mime_type: Some(media.mime_type),
        }
    }

    /// Lower-cased extension without the leading dot.
    ///
    /// Taken from the file name when there is one. Otherwise it is derived from
    /// the MIME type: common chat media types have a fixed extension (voice
    /// notes, `audio/ogg`, are Opus), anything else gets the first extension
    /// registered for the type.
    pub fn extension(&self) -> Option<String> {
        if let Some(extension) =
            self.file_name.as_deref().and_then(|name| Path::new(name).extension()).map(|e| e.to_string_lossy())
        {
            return Some(extension.to_lowercase());
        }
        let essence = self.mime_type.as_deref()?.split(';').next()?.trim().to_ascii_lowercase();
        if let Some((_, extension)) = PREFERRED_EXTENSIONS.iter().find(|(mime, _)| *mime == essence) {
            return Some(extension.to_string());
        }
        mime_guess::get_mime_extensions_str(&essence).and_then(|e| e.first()).map(|e| e.to_string())
    }
}
