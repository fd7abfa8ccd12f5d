//! The hoard ingestion pipeline.
//!
//! Items are enumerated from a chat backup directory or a live group history
//! ([`enumerate`]), classified by extension or MIME type ([`classify()`]),
//! given a fresh name and destination ([`plan()`]), stored locally and then
//! uploaded into a remote folder tree mirroring the local layout
//! ([`Archiver`]). Lyrics found in the chat transcript are archived as a
//! text file on the side ([`export_lyrics`]).

pub mod archive;
mod classify;
pub mod enumerate;
pub mod error;
mod folders;
mod item;
mod local;
mod lyrics;
mod plan;
mod segments;

pub use crate::archive::{ArchiveEvent, Archiver, Summary, UploadResult};
pub use crate::classify::{Classification, classify, transcode_target};
pub use crate::folders::FolderCache;
pub use crate::item::{Content, MediaItem, SourceRef};
pub use crate::local::LocalArchive;
pub use crate::lyrics::export_lyrics;
pub use crate::plan::{DestinationPlan, ID_SPACE, plan, plan_with_id, random_id};
pub use crate::segments::{DEFAULT_KEYWORDS, TextSegment, extract_segments};
