//! Remote folder resolution.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use hoard_storage::{FolderId, RemoteHandle};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::instrument;

/// Resolves folder paths in a remote store, creating missing folders and
/// remembering every `(parent, name)` it has seen.
///
/// One cache lives for one run and is never persisted. The whole resolution
/// runs under a single lock, so two callers resolving the same path at the
/// same time can't both create the same folder.
pub struct FolderCache {
    remote: RemoteHandle,
    folders: Mutex<HashMap<(FolderId, String), FolderId>>,
}

impl FolderCache {
    pub fn new(remote: RemoteHandle) -> Self {
        Self { remote, folders: Mutex::new(HashMap::new()) }
    }

    /// Resolve `segments`, starting from the store's root, into the id of the
    /// last folder.
    ///
    /// When the store has several folders with the same name under the same
    /// parent, the first one listed is used.
    #[instrument(skip_all, fields(path = %segments.join("/")))]
    pub async fn resolve(&self, segments: &[String]) -> Result<FolderId> {
        let mut folders = self.folders.lock().await;
        let mut current = self.remote.root();
        for name in segments {
            let key = (current, name.clone());
            if let Some(id) = folders.get(&key) {
                current = id.clone();
                continue;
            }
            let existing = self.remote.list_folder(name, &key.0).await.or_raise(|| ErrorKind::Remote)?;
            let id = match existing.into_iter().next() {
                Some(entry) => {
                    tracing::debug!(folder = %name, id = %entry.id, "Found remote folder");
                    entry.id
                },
                None => {
                    let id = self.remote.create_folder(name, &key.0).await.or_raise(|| ErrorKind::Remote)?;
                    tracing::info!(folder = %name, id = %id, "Created remote folder");
                    id
                },
            };
            folders.insert(key, id.clone());
            current = id;
        }
        Ok(current)
    }
}
