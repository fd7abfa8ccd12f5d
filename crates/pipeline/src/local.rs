use crate::classify::Classification;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use hoard_config::LocalConfig;
use hoard_storage::LocalBackend;
use std::path::Path;

/// The local archive: one directory per [`Classification`].
#[derive(Debug, Clone)]
pub struct LocalArchive {
    audio: LocalBackend,
    image: LocalBackend,
    video: LocalBackend,
    text: LocalBackend,
    trash: LocalBackend,
}

impl LocalArchive {
    /// Open (creating when missing) every configured directory.
    pub fn new(config: &LocalConfig) -> Result<Self> {
        let open = |c: Classification, dir: &Path| LocalBackend::new(c.to_string(), dir).or_raise(|| ErrorKind::Storage);
        Ok(Self {
            audio: open(Classification::Audio, &config.audio)?,
            image: open(Classification::Image, &config.image)?,
            video: open(Classification::Video, &config.video)?,
            text: open(Classification::Text, &config.text)?,
            trash: open(Classification::Unknown, &config.trash)?,
        })
    }

    pub fn backend(&self, classification: Classification) -> &LocalBackend {
        match classification {
            Classification::Audio => &self.audio,
            Classification::Image => &self.image,
            Classification::Video => &self.video,
            Classification::Text => &self.text,
            Classification::Unknown => &self.trash,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn local_config(root: &Path) -> LocalConfig {
        LocalConfig {
            audio: root.join("audio"),
            image: root.join("images"),
            video: root.join("videos"),
            text: root.join("text"),
            trash: root.join("trash"),
        }
    }

    #[test]
    fn test_directories_created() {
        let dir = tempfile::tempdir().unwrap();
        let archive = LocalArchive::new(&local_config(dir.path())).unwrap();
        for c in Classification::ALL {
            assert!(archive.backend(c).root().is_dir(), "{c}");
        }
        assert_eq!(archive.backend(Classification::Unknown).root(), dir.path().join("trash"));
        assert_eq!(archive.backend(Classification::Unknown).name(), "unknown");
    }

    #[test]
    fn test_relative_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(dir.path());
        config.video = "videos".into();
        let err = LocalArchive::new(&config).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Storage));
    }
}
