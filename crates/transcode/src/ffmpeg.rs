use crate::error::{ErrorKind, Result};
use crate::{AudioFormat, Transcoder};
use async_trait::async_trait;
use exn::ResultExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::instrument;

/// An ffmpeg executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    path: PathBuf,
}
impl Ffmpeg {
    /// Find ffmpeg on the `PATH`.
    pub fn discover() -> Result<Self> {
        match which::which("ffmpeg") {
            Ok(path) => {
                tracing::debug!(ffmpeg = %path.display(), "Discovered ffmpeg");
                Ok(Self { path })
            },
            Err(_) => {
                tracing::info!("ffmpeg executable not found in PATH");
                exn::bail!(ErrorKind::FfmpegNotFound)
            },
        }
    }

    /// Use an explicitly configured binary instead of searching the `PATH`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn arguments(source: &Path, target: &Path, format: AudioFormat) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(source.as_os_str().to_owned());
        args.extend(["-vn", "-f", format.muxer()].map(OsString::from));
        args.push(target.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    #[instrument(skip_all, fields(source = %source.display(), target = %target.display(), format = ?format))]
    async fn transcode(&self, source: &Path, target: &Path, format: AudioFormat) -> Result<()> {
        // ffmpeg's own "No such file" message is buried in stderr; check first.
        if !tokio::fs::try_exists(source).await.or_raise(|| ErrorKind::Io)? {
            exn::bail!(ErrorKind::SourceNotFound(source.to_path_buf()));
        }
        let output = Command::new(&self.path)
            .args(Self::arguments(source, target, format))
            .kill_on_drop(true)
            .output()
            .await
            .or_raise(|| ErrorKind::Io)?;
        if output.status.success() {
            tracing::debug!("Transcode complete");
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(stderr = %stderr.trim(), "ffmpeg reported an error");
        // `-y` lets ffmpeg create the target before failing part way.
        match tokio::fs::remove_file(target).await {
            Ok(()) => tracing::debug!("Removed partial output"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => tracing::warn!(error = %e, "Unable to remove partial output"),
        }
        match output.status.code() {
            Some(code) => exn::bail!(ErrorKind::Failed(code)),
            None => exn::bail!(ErrorKind::Terminated),
        }
    }
}
