//! Storage for archived media.
//!
//! Two halves live here: [`LocalBackend`], one per local category directory,
//! and the [`RemoteStore`] trait describing the folder-tree cloud storage the
//! archive is mirrored into.

mod content;
pub mod error;
mod local;
mod models;
mod path;
pub mod remote;

pub use crate::content::{ByteStream, FileContent};
pub use crate::local::LocalBackend;
pub use crate::models::{FileId, FolderId, RemoteEntry};
pub use crate::path::{validate as validate_path, validate_name};
pub use crate::remote::RemoteStore;
use std::sync::Arc;

pub type RemoteHandle = Arc<dyn RemoteStore + Send + Sync>;
