//! Archiving items locally and remotely.
//!
//! The [`Archiver`] takes one [`MediaItem`](crate::MediaItem) at a time
//! through classify → plan → local copy (or transcode) → remote folder
//! resolution → upload. [`Archiver::run`] drives a whole item stream through
//! it, strictly one item after the other, and reports progress as
//! [`ArchiveEvent`]s.
//!
//! Failures are per item: a failed transcode or upload is reported and the
//! next item is attempted. A local file that was written before the upload
//! failed is left in place.

mod item;
mod stream;

pub use self::stream::{ArchiveEvent, Summary};
use crate::classify::Classification;
use crate::error::Result;
use crate::folders::FolderCache;
use crate::item::SourceRef;
use crate::local::LocalArchive;
use hoard_config::Config;
use hoard_storage::{FileId, FolderId, RemoteHandle};
use hoard_transcode::TranscoderHandle;
use std::path::PathBuf;

/// The outcome of archiving one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub source: SourceRef,
    pub classification: Classification,
    pub local_path: PathBuf,
    pub remote_folder: FolderId,
    pub remote_file: FileId,
    pub file_name: String,
}

pub struct Archiver {
    local: LocalArchive,
    remote: RemoteHandle,
    transcoder: TranscoderHandle,
    /// Lives as long as the archiver: one run.
    folders: FolderCache,
    root_folder: String,
}

impl Archiver {
    /// Open the local archive directories and prepare an empty folder cache.
    pub fn new(config: &Config, remote: RemoteHandle, transcoder: TranscoderHandle) -> Result<Self> {
        Ok(Self {
            local: LocalArchive::new(&config.local)?,
            folders: FolderCache::new(remote.clone()),
            remote,
            transcoder,
            root_folder: config.remote.root_folder.clone(),
        })
    }

    pub fn local(&self) -> &LocalArchive {
        &self.local
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use exn::ResultExt;
    use hoard_storage::remote::MockRemote;
    use hoard_transcode::error::{ErrorKind as TranscodeErrorKind, Result as TranscodeResult};
    use hoard_transcode::{AudioFormat, Transcoder};
    use std::path::Path;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Records calls and writes a fake MP3 to the target.
    #[derive(Default)]
    pub(crate) struct FakeTranscoder {
        pub(crate) calls: Mutex<Vec<(PathBuf, PathBuf, AudioFormat)>>,
        pub(crate) fail: bool,
    }

    #[async_trait]
    impl Transcoder for FakeTranscoder {
        async fn transcode(&self, source: &Path, target: &Path, format: AudioFormat) -> TranscodeResult<()> {
            self.calls.lock().await.push((source.to_path_buf(), target.to_path_buf(), format));
            if self.fail {
                exn::bail!(TranscodeErrorKind::Failed(1));
            }
            let mut data = b"ID3".to_vec();
            data.extend(tokio::fs::read(source).await.or_raise(|| TranscodeErrorKind::Io)?);
            tokio::fs::write(target, data).await.or_raise(|| TranscodeErrorKind::Io)?;
            Ok(())
        }
    }

    pub(crate) struct Harness {
        pub(crate) dir: tempfile::TempDir,
        pub(crate) remote: Arc<MockRemote>,
        pub(crate) transcoder: Arc<FakeTranscoder>,
        pub(crate) archiver: Archiver,
    }

    pub(crate) fn harness(remote: MockRemote, transcoder: FakeTranscoder) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.local = crate::local::tests::local_config(&dir.path().join("archive"));
        config.remote.root_folder = "Coral".to_string();
        let remote = Arc::new(remote);
        let transcoder = Arc::new(transcoder);
        let archiver = Archiver::new(&config, remote.clone(), transcoder.clone()).unwrap();
        Harness { dir, remote, transcoder, archiver }
    }

    #[test]
    fn test_new_creates_local_directories() {
        let h = harness(MockRemote::default(), FakeTranscoder::default());
        for c in Classification::ALL {
            assert!(h.archiver.local().backend(c).root().starts_with(h.dir.path()));
            assert!(h.archiver.local().backend(c).root().is_dir());
        }
    }
}
