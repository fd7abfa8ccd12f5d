//! Identifiers handed out by remote stores.
//!
//! Both identifiers are opaque: only the store that issued them knows what
//! they mean. Nothing in the pipeline should parse them.

use derive_more::{Display, From};

/// Identifier of a folder in a remote store.
#[derive(Debug, Clone, Display, From, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(String);
impl FolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for FolderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of an uploaded file in a remote store.
#[derive(Debug, Clone, Display, From, PartialEq, Eq, Hash)]
pub struct FileId(String);
impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A folder returned by a remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub id: FolderId,
    pub name: String,
}
impl RemoteEntry {
    pub fn new(id: impl Into<FolderId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}
