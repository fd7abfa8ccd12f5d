//! Dry-run remote store.
//!
//! This module provides a remote store that wraps (optionally) another
//! implementation, forwards lookups to it, and prevents every write from
//! executing while still indicating success on return.

use async_trait::async_trait;

use crate::content::FileContent;
use crate::error::Result;
use crate::models::{FileId, FolderId, RemoteEntry};
use crate::{RemoteHandle, RemoteStore};

/// Dry-run remote store.
///
/// Lookups are answered by the wrapped store when there is one (so the log
/// shows which folders would be reused) and are always empty otherwise.
/// Creations are dropped, logging an [`info event`](tracing::Event), and
/// answered with a synthetic identifier derived from the requested name.
#[derive(Clone)]
pub struct DryRunRemote {
    inner: Option<RemoteHandle>,
}
impl DryRunRemote {
    pub fn new(inner: Option<RemoteHandle>) -> Self {
        Self { inner }
    }

    fn synthetic(parent: &FolderId, name: &str) -> String {
        format!("dry-run:{parent}/{name}")
    }
}

#[async_trait]
impl RemoteStore for DryRunRemote {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn root(&self) -> FolderId {
        self.inner.as_ref().map_or_else(|| FolderId::new("root"), |inner| inner.root())
    }

    async fn list_folder(&self, name: &str, parent: &FolderId) -> Result<Vec<RemoteEntry>> {
        match &self.inner {
            // Synthetic parents never exist remotely.
            Some(inner) if !parent.as_str().starts_with("dry-run:") => inner.list_folder(name, parent).await,
            _ => Ok(Vec::new()),
        }
    }

    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        tracing::info!(folder = name, parent = %parent, "Skipping folder creation during dry-run");
        Ok(FolderId::new(Self::synthetic(parent, name)))
    }

    async fn create_file(&self, name: &str, parent: &FolderId, mime_type: &str, content: FileContent) -> Result<FileId> {
        tracing::info!(file = name, parent = %parent, mime_type, bytes = content.len(), "Skipping upload during dry-run");
        Ok(FileId::new(Self::synthetic(parent, name)))
    }
}
