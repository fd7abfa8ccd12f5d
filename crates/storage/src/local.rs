//! Local filesystem archive directory.
//!
//! Each content category is archived into its own directory on disk. A
//! [`LocalBackend`] wraps one of those directories and accesses it using
//! `tokio::fs` for async I/O.

use crate::content::FileContent;
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::instrument;

/// A local archive directory.
///
/// All paths are relative to the configured root directory.
///
/// # Examples
///
/// ```no_run
/// use hoard_storage::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let audio = LocalBackend::new("audio", "/srv/archive/audio").map_err(|e| e.to_string())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalBackend {
    name: String,
    /// Directory every file of this backend lands in
    root: PathBuf,
}
impl LocalBackend {
    /// Open an archive directory, creating it (and any missing parents) if it
    /// doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, points at something that
    /// isn't a directory, or can't be created.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Use non-async here; it'll only happen once on startup and it's
            // not worth the hassle of making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
            tracing::info!(dir = %root.display(), "Created local archive directory");
        }

        Ok(Self { name: name.into(), root })
    }

    /// Name of the directory (used for logging only).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the absolute path for a relative archive path.
    ///
    /// Validates the path and joins it with the root directory.
    pub fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    /// Make sure the parent directory of an absolute path exists. Creating a
    /// directory that already exists is not an error.
    async fn ensure_parent(abs_path: &Path, path: &Path) -> Result<()> {
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, path))?;
        }
        Ok(())
    }

    /// Write file contents, creating or overwriting the file.
    #[instrument(skip_all, fields(dir = %self.name, path = %path.display(), bytes = data.len()))]
    pub async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Self::ensure_parent(&abs_path, path).await?;
        Ok(fs::write(&abs_path, data).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    /// Size in bytes of an archived file.
    pub async fn stat(&self, path: &Path) -> Result<u64> {
        let abs_path = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        if !metadata.is_file() {
            exn::bail!(ErrorKind::InvalidPath(path.to_path_buf()));
        }
        Ok(metadata.len())
    }

    /// Open an archived file as a byte stream, without reading it into memory.
    pub async fn open(&self, path: &Path) -> Result<FileContent> {
        let len = self.stat(path).await?;
        let abs_path = self.absolute_path(path)?;
        let file = fs::File::open(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        Ok(FileContent::new(len, Box::pin(ReaderStream::new(file))))
    }

    pub async fn delete(&self, path: &Path) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::remove_file(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    /// Copy a file from anywhere on disk into this directory.
    ///
    /// `source` is an absolute path outside of the archive (a backup entry,
    /// usually); `path` is relative to this backend's root. Returns the number
    /// of bytes copied.
    #[instrument(skip_all, fields(dir = %self.name, source = %source.display(), path = %path.display()))]
    pub async fn copy_from(&self, source: &Path, path: &Path) -> Result<u64> {
        let abs_path = self.absolute_path(path)?;
        Self::ensure_parent(&abs_path, path).await?;
        Ok(fs::copy(source, &abs_path).await.map_err(|e| Self::map_io_error(e, source))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("audio", temp_dir.path()).is_ok());
        assert!(LocalBackend::new("audio", "relative/path").is_err());
        assert!(LocalBackend::new("audio", "./relative").is_err());
    }

    #[test]
    fn test_new_creates_missing_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("archive/audio");
        LocalBackend::new("audio", &root).unwrap();
        assert!(root.is_dir());
        // Already existing is fine.
        LocalBackend::new("audio", &root).unwrap();
    }

    #[test]
    fn test_new_rejects_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, b"data").unwrap();
        let err = LocalBackend::new("audio", &file).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("image", temp_dir.path()).unwrap();
        let expected = temp_dir.path().join("imagem_1.jpeg");
        assert_eq!(backend.absolute_path(Path::new("imagem_1.jpeg")).unwrap(), expected);
        assert!(backend.absolute_path(Path::new("../etc/passwd")).is_err());
    }

    #[tokio::test]
    async fn test_write_and_open() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("text", temp_dir.path()).unwrap();
        backend.write(Path::new("letra_1.txt"), b"Letra: abc").await.unwrap();
        assert_eq!(backend.stat(Path::new("letra_1.txt")).await.unwrap(), 10);
        let content = backend.open(Path::new("letra_1.txt")).await.unwrap();
        assert_eq!(content.len(), 10);
        assert_eq!(content.collect().await.unwrap(), b"Letra: abc");
        backend.delete(Path::new("letra_1.txt")).await.unwrap();
        assert!(!temp_dir.path().join("letra_1.txt").exists());
        let err = backend.delete(Path::new("letra_1.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        let err = backend.open(Path::new("letra_1.txt")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_open_streams_large_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("video", temp_dir.path()).unwrap();
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        backend.write(Path::new("video_1.mp4"), &data).await.unwrap();
        let content = backend.open(Path::new("video_1.mp4")).await.unwrap();
        assert_eq!(content.len(), 200_000);
        // Read in chunks, not as one buffer.
        let chunks: Vec<_> = futures::StreamExt::collect(content.into_stream()).await;
        assert!(chunks.len() > 1);
        let joined: Vec<u8> = chunks.into_iter().flat_map(|c| c.unwrap().to_vec()).collect();
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn test_stat_rejects_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("video", temp_dir.path()).unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
        let err = backend.stat(Path::new("sub")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_copy_from() {
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("IMG-0001.jpg");
        std::fs::write(&source, b"jpeg bytes").unwrap();

        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("image", temp_dir.path()).unwrap();
        let copied = backend.copy_from(&source, Path::new("imagem_9.jpg")).await.unwrap();
        assert_eq!(copied, 10);
        assert_eq!(std::fs::read(temp_dir.path().join("imagem_9.jpg")).unwrap(), b"jpeg bytes");
        // Source is left alone.
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_copy_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("image", temp_dir.path()).unwrap();
        let missing = temp_dir.path().join("missing.jpg");
        let err = backend.copy_from(&missing, Path::new("imagem_1.jpg")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(p) if p == &missing));
    }

    #[tokio::test]
    async fn test_path_security() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("trash", temp_dir.path()).unwrap();
        assert!(backend.open(Path::new("../etc/passwd")).await.is_err());
        assert!(backend.write(Path::new("../escape"), b"data").await.is_err());
    }
}
