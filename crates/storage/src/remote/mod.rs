//! Remote store trait and implementations.
//!
//! This module defines the `RemoteStore` trait: the minimal folder-tree API
//! the archive needs from a cloud storage provider. Authentication is the
//! implementation's business; callers receive an already-authorized handle.

mod dry_run;
#[cfg(feature = "drive")]
mod drive;
#[cfg(feature = "mock")]
mod mock;

pub use self::dry_run::DryRunRemote;
#[cfg(feature = "drive")]
pub use self::drive::DriveBackend;
#[cfg(feature = "mock")]
pub use self::mock::{MockFile, MockRemote};
use crate::content::FileContent;
use crate::error::Result;
use crate::models::{FileId, FolderId, RemoteEntry};
use async_trait::async_trait;

/// Unified interface for remote folder-tree stores.
///
/// Folders are identified by opaque [`FolderId`]s handed out by the store, and
/// a tree is walked one name at a time starting from [`root()`](Self::root).
/// Names are single path segments; implementations should reject anything
/// that fails [`validate_name`](crate::validate_name).
///
/// # Examples
///
/// ```
/// use hoard_storage::{FolderId, RemoteStore, error::Result};
///
/// async fn find_or_create(store: &dyn RemoteStore, name: &str) -> Result<FolderId> {
///     let root = store.root();
///     match store.list_folder(name, &root).await?.into_iter().next() {
///         Some(existing) => Ok(existing.id),
///         None => store.create_folder(name, &root).await,
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Name of the configured store (used for logging only).
    fn name(&self) -> &str;

    /// Identifier of the top of the tree.
    fn root(&self) -> FolderId;

    /// List the folders called exactly `name` directly inside `parent`.
    ///
    /// Stores that allow duplicate names may return more than one entry; the
    /// caller decides which one wins.
    async fn list_folder(&self, name: &str, parent: &FolderId) -> Result<Vec<RemoteEntry>>;

    /// Create a folder called `name` inside `parent`.
    ///
    /// This always creates; it does not check for an existing folder of the
    /// same name first.
    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId>;

    /// Upload a file called `name` into `parent`, streaming its content.
    ///
    /// # Notes
    /// - No existence check is performed; stores that key by name may
    ///   overwrite, stores that key by id (Google Drive) will keep both.
    async fn create_file(&self, name: &str, parent: &FolderId, mime_type: &str, content: FileContent) -> Result<FileId>;
}
