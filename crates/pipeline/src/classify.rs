//! Content classification.
//!
//! An item's category is decided by its declared MIME type when it has one,
//! and by its file extension otherwise. Text is never assigned here: only the
//! lyrics export produces text items.

use derive_more::Display;
use hoard_transcode::AudioFormat;

const AUDIO_EXTENSIONS: &[&str] = &["opus", "mp3", "wav", "aac"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Content category of an archived item.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq, Hash)]
pub enum Classification {
    #[display("audio")]
    Audio,
    #[display("image")]
    Image,
    #[display("video")]
    Video,
    #[display("text")]
    Text,
    #[display("unknown")]
    Unknown,
}

impl Classification {
    pub const ALL: [Self; 5] = [Self::Audio, Self::Image, Self::Video, Self::Text, Self::Unknown];

    /// Prefix of generated file names.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Image => "imagem",
            Self::Video => "video",
            Self::Text => "letra",
            Self::Unknown => "desconhecido",
        }
    }

    /// Name of the remote folder the category is uploaded into.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Audio => "Audios",
            Self::Image => "Imagens",
            Self::Video => "Videos",
            Self::Text => "Letras",
            Self::Unknown => "Trash",
        }
    }
}

/// Strip an optional leading dot and lowercase.
pub(crate) fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

/// Classify an item from its extension and (optional) MIME type.
///
/// A MIME type always wins over the extension, even when it doesn't match any
/// category and the extension would have.
pub fn classify(extension: Option<&str>, mime_type: Option<&str>) -> Classification {
    if let Some(mime_type) = mime_type {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        return if mime_type.starts_with("audio/") {
            Classification::Audio
        } else if mime_type.starts_with("image/") {
            Classification::Image
        } else if mime_type.starts_with("video/") {
            Classification::Video
        } else {
            Classification::Unknown
        };
    }
    let Some(extension) = extension.map(normalize_extension) else {
        return Classification::Unknown;
    };
    if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
        Classification::Audio
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Classification::Image
    } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Classification::Video
    } else {
        Classification::Unknown
    }
}

/// Format an item must be transcoded to before it is stored, if any.
pub fn transcode_target(extension: Option<&str>) -> Option<AudioFormat> {
    match extension.map(normalize_extension).as_deref() {
        Some("opus") => Some(AudioFormat::Mp3),
        _ => None,
    }
}
