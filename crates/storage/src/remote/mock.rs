//! In-memory remote store for testing.

use crate::content::FileContent;
use crate::error::{ErrorKind, Result};
use crate::models::{FileId, FolderId, RemoteEntry};
use crate::path::validate_name;
use crate::RemoteStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

const ROOT: &str = "root";

/// A file uploaded to a [`MockRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFile {
    pub id: FileId,
    pub name: String,
    pub parent: FolderId,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
struct MockFolder {
    id: FolderId,
    name: String,
    parent: FolderId,
}

/// In-memory remote store for testing.
///
/// Folders and files are kept behind [`RwLock`]s so all trait methods can
/// operate on `&self`. Every call is counted, which lets tests assert how many
/// round trips a piece of code made, and uploads can be made to fail on
/// chosen calls.
///
/// # Examples
///
/// ```
/// use hoard_storage::remote::MockRemote;
/// use hoard_storage::{FileContent, RemoteStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let remote = MockRemote::default();
/// let folder = remote.create_folder("Audios", &remote.root()).await.map_err(|e| e.to_string())?;
/// let content = FileContent::from_bytes(&b"..."[..]);
/// remote.create_file("audio_1.mp3", &folder, "audio/mpeg", content).await.map_err(|e| e.to_string())?;
/// assert_eq!(remote.files().await.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MockRemote {
    name: String,
    folders: RwLock<Vec<MockFolder>>,
    files: RwLock<Vec<MockFile>>,
    lookups: AtomicUsize,
    creations: AtomicUsize,
    uploads: AtomicUsize,
    failing_uploads: HashSet<usize>,
    failing_lookups: HashSet<String>,
}

impl MockRemote {
    /// Change the name of the mock store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make the given upload attempts fail (1-based, counting every call to
    /// [`create_file`](RemoteStore::create_file)).
    pub fn with_failing_uploads(mut self, attempts: impl IntoIterator<Item = usize>) -> Self {
        self.failing_uploads.extend(attempts);
        self
    }

    /// Make every lookup of a folder with this name fail.
    pub fn with_failing_lookup(mut self, name: impl Into<String>) -> Self {
        self.failing_lookups.insert(name.into());
        self
    }

    /// Number of [`list_folder`](RemoteStore::list_folder) calls made so far.
    pub fn folder_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Number of [`create_folder`](RemoteStore::create_folder) calls made so far.
    pub fn folder_creations(&self) -> usize {
        self.creations.load(Ordering::SeqCst)
    }

    /// Number of [`create_file`](RemoteStore::create_file) calls made so far,
    /// including failed ones.
    pub fn upload_attempts(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Files successfully uploaded, in upload order.
    pub async fn files(&self) -> Vec<MockFile> {
        self.files.read().await.clone()
    }

    /// Names of the folders from the root down to (and including) `id`.
    ///
    /// Returns an empty path for the root, and `None` for unknown folders.
    pub async fn folder_path(&self, id: &FolderId) -> Option<Vec<String>> {
        let folders = self.folders.read().await;
        let mut path = Vec::new();
        let mut current = id.clone();
        while current.as_str() != ROOT {
            let folder = folders.iter().find(|f| f.id == current)?;
            path.push(folder.name.clone());
            current = folder.parent.clone();
        }
        path.reverse();
        Some(path)
    }

    async fn folder_exists(&self, id: &FolderId) -> bool {
        id.as_str() == ROOT || self.folders.read().await.iter().any(|f| &f.id == id)
    }
}
impl Default for MockRemote {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            folders: RwLock::new(Vec::new()),
            files: RwLock::new(Vec::new()),
            lookups: AtomicUsize::new(0),
            creations: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
            failing_uploads: HashSet::new(),
            failing_lookups: HashSet::new(),
        }
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> FolderId {
        FolderId::new(ROOT)
    }

    async fn list_folder(&self, name: &str, parent: &FolderId) -> Result<Vec<RemoteEntry>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing_lookups.contains(name) {
            exn::bail!(ErrorKind::Network(format!("lookup of {name:?} failed")));
        }
        let folders = self.folders.read().await;
        Ok(folders
            .iter()
            .filter(|f| &f.parent == parent && f.name == name)
            .map(|f| RemoteEntry::new(f.id.clone(), f.name.clone()))
            .collect())
    }

    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        validate_name(name)?;
        if !self.folder_exists(parent).await {
            exn::bail!(ErrorKind::BackendError(format!("parent folder {parent} does not exist")));
        }
        let number = self.creations.fetch_add(1, Ordering::SeqCst) + 1;
        let id = FolderId::new(format!("folder-{number}"));
        self.folders.write().await.push(MockFolder {
            id: id.clone(),
            name: name.to_string(),
            parent: parent.clone(),
        });
        Ok(id)
    }

    async fn create_file(&self, name: &str, parent: &FolderId, mime_type: &str, content: FileContent) -> Result<FileId> {
        let attempt = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        validate_name(name)?;
        if self.failing_uploads.contains(&attempt) {
            exn::bail!(ErrorKind::Network(format!("upload attempt {attempt} failed")));
        }
        if !self.folder_exists(parent).await {
            exn::bail!(ErrorKind::BackendError(format!("parent folder {parent} does not exist")));
        }
        let data = content.collect().await?;
        let id = FileId::new(format!("file-{attempt}"));
        self.files.write().await.push(MockFile {
            id: id.clone(),
            name: name.to_string(),
            parent: parent.clone(),
            mime_type: mime_type.to_string(),
            data,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(data: &'static [u8]) -> FileContent {
        FileContent::from_bytes(data)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let remote = MockRemote::default();
        let root = remote.root();
        assert!(remote.list_folder("Arquivo", &root).await.unwrap().is_empty());
        let id = remote.create_folder("Arquivo", &root).await.unwrap();
        let found = remote.list_folder("Arquivo", &root).await.unwrap();
        assert_eq!(found, vec![RemoteEntry::new(id, "Arquivo")]);
        assert_eq!(remote.folder_lookups(), 2);
        assert_eq!(remote.folder_creations(), 1);
    }

    #[tokio::test]
    async fn test_same_name_different_parent() {
        let remote = MockRemote::default();
        let a = remote.create_folder("A", &remote.root()).await.unwrap();
        let b = remote.create_folder("B", &remote.root()).await.unwrap();
        remote.create_folder("Audios", &a).await.unwrap();
        assert_eq!(remote.list_folder("Audios", &a).await.unwrap().len(), 1);
        assert!(remote.list_folder("Audios", &b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_folder_path() {
        let remote = MockRemote::default();
        let a = remote.create_folder("Arquivo", &remote.root()).await.unwrap();
        let b = remote.create_folder("Videos", &a).await.unwrap();
        assert_eq!(remote.folder_path(&b).await.unwrap(), vec!["Arquivo", "Videos"]);
        assert_eq!(remote.folder_path(&remote.root()).await.unwrap(), Vec::<String>::new());
        assert!(remote.folder_path(&FolderId::new("nope")).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_parent_rejected() {
        let remote = MockRemote::default();
        let missing = FolderId::new("missing");
        assert!(remote.create_folder("A", &missing).await.is_err());
        assert!(remote.create_file("a.txt", &missing, "text/plain", upload(b"a")).await.is_err());
    }

    #[tokio::test]
    async fn test_failing_uploads() {
        let remote = MockRemote::default().with_failing_uploads([2]);
        let root = remote.root();
        remote.create_file("one.jpg", &root, "image/jpeg", upload(b"1")).await.unwrap();
        let err = remote.create_file("two.jpg", &root, "image/jpeg", upload(b"2")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        remote.create_file("three.jpg", &root, "image/jpeg", upload(b"3")).await.unwrap();
        let files = remote.files().await;
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["one.jpg", "three.jpg"]);
        assert_eq!(files[1].data, b"3");
        assert_eq!(remote.upload_attempts(), 3);
    }

    #[tokio::test]
    async fn test_failing_lookup() {
        let remote = MockRemote::default().with_failing_lookup("Videos");
        assert!(remote.list_folder("Videos", &remote.root()).await.is_err());
        assert!(remote.list_folder("Audios", &remote.root()).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let remote = MockRemote::default();
        let err = remote.create_folder("a/b", &remote.root()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidName(_)));
    }
}
