//! Configuration for hoard.
//!
//! Configuration is layered with [`figment`], later layers overriding earlier
//! ones:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A TOML file: the one passed on the command line, or `hoard.toml` in the
//!    platform configuration directory if it exists.
//! 3. `HOARD_`-prefixed environment variables, with `__` separating sections
//!    (`HOARD_SOURCE__PAGE_SIZE=100`).
//! 4. The flat variables older deployments were configured with
//!    (`LOCAL_AUDIO_DIR`, `ROOT_FOLDER_NAME`, ...).
//!
//! ```toml
//! [local]
//! audio = "/srv/coral/audio"
//! image = "/srv/coral/images"
//!
//! [remote]
//! root_folder = "Coral"
//! credentials = "/etc/hoard/token.json"
//!
//! [source]
//! backup_dir = "/srv/coral/backup"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Flat environment variables and the configuration keys they set.
const LEGACY_VARIABLES: &[(&str, &str)] = &[
    ("LOCAL_AUDIO_DIR", "local.audio"),
    ("LOCAL_IMAGE_DIR", "local.image"),
    ("LOCAL_VIDEO_DIR", "local.video"),
    ("LOCAL_TEXT_DIR", "local.text"),
    ("LOCAL_TRASH_DIR", "local.trash"),
    ("ROOT_FOLDER_NAME", "remote.root_folder"),
    ("GOOGLE_SERVICE_ACCOUNT_PATH", "remote.credentials"),
];

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_CHAT_FILE: &str = "_chat.txt";
pub const DEFAULT_KEYWORDS: &[&str] = &["letra", "cifra", "música", "verso", "estrofe", "refrão"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub local: LocalConfig,
    pub remote: RemoteConfig,
    pub source: SourceConfig,
    pub lyrics: LyricsConfig,
    pub transcode: TranscodeConfig,
}

/// One local archive directory per content category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub audio: PathBuf,
    pub image: PathBuf,
    pub video: PathBuf,
    pub text: PathBuf,
    /// Files that couldn't be classified
    pub trash: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Name of the top-level remote folder everything is archived under.
    pub root_folder: String,
    /// File holding the remote store's access token.
    pub credentials: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory of an exported chat backup.
    pub backup_dir: Option<PathBuf>,
    /// Name of the transcript inside the backup directory.
    pub chat_file: String,
    /// Display name of the group chat, for live history.
    pub group: Option<String>,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Explicit path to `ffmpeg`; looked up on `PATH` when unset.
    pub ffmpeg: Option<PathBuf>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        // Relative fallbacks fail validation, which is what we want when the
        // platform has no data directory to offer.
        let base = project_dirs().map(|dirs| dirs.data_dir().to_path_buf()).unwrap_or_default();
        Self {
            audio: base.join("audio"),
            image: base.join("images"),
            video: base.join("videos"),
            text: base.join("text"),
            trash: base.join("trash"),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backup_dir: None,
            chat_file: DEFAULT_CHAT_FILE.to_string(),
            group: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self { keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect() }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "hoard")
}

/// Location of the configuration file used when none is given explicitly.
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("hoard.toml"))
}

impl Config {
    /// Build the layered configuration sources.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file_exact(path));
            },
            None => {
                if let Some(default) = default_path() {
                    figment = figment.merge(Toml::file(default));
                }
            },
        }
        Ok(figment.merge(Env::prefixed("HOARD_").split("__")).merge(legacy_env()))
    }

    /// Extract and validate a configuration from arbitrary sources.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract().map_err(|e| ErrorKind::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration from the file, environment and defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::from_figment(&Self::figment(path)?)?;
        tracing::debug!(
            root_folder = %config.remote.root_folder,
            backup_dir = ?config.source.backup_dir,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let dirs = [
            ("local.audio", &self.local.audio),
            ("local.image", &self.local.image),
            ("local.video", &self.local.video),
            ("local.text", &self.local.text),
            ("local.trash", &self.local.trash),
        ];
        for (key, dir) in dirs {
            if !dir.is_absolute() {
                exn::bail!(ErrorKind::Invalid(format!("{key} must be an absolute path, got {:?}", dir.display())));
            }
        }
        if let Some(backup) = &self.source.backup_dir
            && !backup.is_absolute()
        {
            exn::bail!(ErrorKind::Invalid(format!("source.backup_dir must be an absolute path, got {:?}", backup.display())));
        }
        if self.remote.root_folder.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("remote.root_folder must not be empty".to_string()));
        }
        if self.source.page_size == 0 {
            exn::bail!(ErrorKind::Invalid("source.page_size must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_VARIABLES
            .iter()
            .find(|(variable, _)| key.as_str().eq_ignore_ascii_case(variable))
            .map(|(_, mapped)| (*mapped).into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    fn base_toml(dir: &Path) -> String {
        format!(
            r#"
            [local]
            audio = "{0}/audio"
            image = "{0}/images"
            video = "{0}/videos"
            text = "{0}/text"
            trash = "{0}/trash"

            [remote]
            root_folder = "Coral"
            "#,
            dir.display()
        )
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.page_size, 50);
        assert_eq!(config.source.chat_file, "_chat.txt");
        assert_eq!(config.lyrics.keywords.len(), 6);
        assert!(config.lyrics.keywords.contains(&"refrão".to_string()));
        assert!(config.transcode.ffmpeg.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            let mut toml = base_toml(jail.directory());
            toml.push_str("\n[source]\npage_size = 20\ngroup = \"Coral da Igreja\"\n");
            jail.create_file("hoard.toml", &toml)?;
            let config = Config::load(Some(&jail.directory().join("hoard.toml"))).unwrap();
            assert_eq!(config.remote.root_folder, "Coral");
            assert_eq!(config.local.video, jail.directory().join("videos"));
            assert_eq!(config.source.page_size, 20);
            assert_eq!(config.source.group.as_deref(), Some("Coral da Igreja"));
            // Untouched keys keep their defaults.
            assert_eq!(config.source.chat_file, "_chat.txt");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("hoard.toml", &base_toml(jail.directory()))?;
            jail.set_env("HOARD_REMOTE__ROOT_FOLDER", "Arquivo");
            jail.set_env("HOARD_SOURCE__PAGE_SIZE", "10");
            let config = Config::load(Some(&jail.directory().join("hoard.toml"))).unwrap();
            assert_eq!(config.remote.root_folder, "Arquivo");
            assert_eq!(config.source.page_size, 10);
            Ok(())
        });
    }

    #[test]
    fn test_legacy_env() {
        Jail::expect_with(|jail| {
            jail.create_file("hoard.toml", &base_toml(jail.directory()))?;
            let audio = jail.directory().join("legacy-audio");
            jail.set_env("LOCAL_AUDIO_DIR", audio.display());
            jail.set_env("ROOT_FOLDER_NAME", "Legado");
            jail.set_env("GOOGLE_SERVICE_ACCOUNT_PATH", "/etc/hoard/token.json");
            let config = Config::load(Some(&jail.directory().join("hoard.toml"))).unwrap();
            assert_eq!(config.local.audio, audio);
            assert_eq!(config.remote.root_folder, "Legado");
            assert_eq!(config.remote.credentials, Some(PathBuf::from("/etc/hoard/token.json")));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[rstest]
    #[case::relative_dir("[local]\naudio = \"relative/audio\"\n", "local.audio")]
    #[case::empty_root("[remote]\nroot_folder = \"  \"\n", "root_folder")]
    #[case::zero_page_size("[source]\npage_size = 0\n", "page_size")]
    #[case::relative_backup("[source]\nbackup_dir = \"backup\"\n", "backup_dir")]
    fn test_validation(#[case] extra: &str, #[case] expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(&base_toml(dir.path())))
            .merge(Toml::string(extra));
        let err = Config::from_figment(&figment).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(msg) if msg.contains(expected)), "{err:?}");
    }

    #[test]
    fn test_invalid_type() {
        let dir = tempfile::tempdir().unwrap();
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(&base_toml(dir.path())))
            .merge(Toml::string("[source]\npage_size = \"many\"\n"));
        let err = Config::from_figment(&figment).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
    }
}
