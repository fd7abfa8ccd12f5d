//! Destination planning.
//!
//! Every archived item gets a fresh name, `{prefix}_{id}.{ext}`, where the id
//! is drawn at random from `0..1_000_000_000`. The same name is used locally
//! and remotely. There is no collision check: two items drawing the same id
//! in the same category would overwrite each other locally and sit side by
//! side remotely.

use crate::classify::{Classification, normalize_extension, transcode_target};
use crate::item::MediaItem;
use hoard_transcode::AudioFormat;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Exclusive upper bound of generated ids.
pub const ID_SPACE: u32 = 1_000_000_000;

/// Where an item ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlan {
    pub classification: Classification,
    /// Absolute path of the archived file.
    pub local_path: PathBuf,
    /// Remote folder names, from the top of the tree down.
    pub remote_segments: Vec<String>,
    /// File name, shared by the local and the remote copy.
    pub file_name: String,
    /// Set when the item has to be transcoded on its way into the archive.
    pub transcode: Option<AudioFormat>,
}

pub fn random_id() -> u32 {
    rand::rng().random_range(0..ID_SPACE)
}

/// Plan an item's destination with a random id.
pub fn plan(item: &MediaItem, classification: Classification, local_dir: &Path, root_folder: &str) -> DestinationPlan {
    plan_with_id(item, classification, local_dir, root_folder, random_id())
}

pub fn plan_with_id(
    item: &MediaItem,
    classification: Classification,
    local_dir: &Path,
    root_folder: &str,
    id: u32,
) -> DestinationPlan {
    let extension = item.extension();
    // Only audio is transcoded; an `.opus` file sent as a document stays as is.
    let transcode = transcode_target(extension.as_deref()).filter(|_| classification == Classification::Audio);
    let extension = match transcode {
        Some(format) => Some(format.extension().to_string()),
        None => extension.map(|e| normalize_extension(&e)).filter(|e| !e.is_empty()),
    };
    let file_name = match extension {
        Some(extension) => format!("{}_{id}.{extension}", classification.prefix()),
        None => format!("{}_{id}", classification.prefix()),
    };
    DestinationPlan {
        classification,
        local_path: local_dir.join(&file_name),
        remote_segments: vec![root_folder.to_string(), classification.display_name().to_string()],
        file_name,
        transcode,
    }
}
