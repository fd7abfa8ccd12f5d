mod cli;
mod error;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use futures::StreamExt;
use hoard_config::Config;
use hoard_pipeline::enumerate::backup_items;
use hoard_pipeline::{ArchiveEvent, Archiver, Summary, export_lyrics};
use hoard_storage::RemoteHandle;
use hoard_storage::remote::{DriveBackend, DryRunRemote};
use hoard_transcode::{Ffmpeg, TranscoderHandle};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: Level) {
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    // Ignore error if already set.
    let _ = set_global_default(subscriber);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.level());
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "{e}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let backup_dir = match cli.command.source().dir.clone().or_else(|| config.source.backup_dir.clone()) {
        Some(dir) => dir,
        None => exn::bail!(ErrorKind::NoBackupDir),
    };
    let remote = remote_store(&config, cli.dry_run)?;
    tracing::info!(store = remote.name(), root_folder = %config.remote.root_folder, "Using remote store");
    let transcoder = transcoder(&config, cli.command.archives_media())?;
    let archiver = Archiver::new(&config, remote, transcoder).or_raise(|| ErrorKind::LocalArchive)?;

    if cli.command.exports_lyrics() {
        let chat_file = backup_dir.join(&config.source.chat_file);
        match export_lyrics(&archiver, &chat_file, &config.lyrics.keywords).await.or_raise(|| ErrorKind::Lyrics)? {
            Some(result) => println!("Lyrics archived as {}", result.file_name),
            None => println!("No lyrics found"),
        }
    }

    if cli.command.archives_media() {
        let items = backup_items(backup_dir).await.or_raise(|| ErrorKind::Media)?;
        let mut events = std::pin::pin!(archiver.run(items));
        let mut summary = Summary::default();
        while let Some(event) = events.next().await {
            // Failed items have already been logged by the archiver.
            if let Ok(ArchiveEvent::Complete(complete)) = event {
                summary = complete;
            }
        }
        println!("Archived {} item(s), {} failed", summary.archived, summary.failed);
    }
    Ok(())
}

fn remote_store(config: &Config, dry_run: bool) -> Result<RemoteHandle> {
    let drive = match &config.remote.credentials {
        Some(path) => {
            let drive = DriveBackend::from_credentials_file("drive", path).or_raise(|| ErrorKind::Remote)?;
            Some(Arc::new(drive) as RemoteHandle)
        },
        None => None,
    };
    match (drive, dry_run) {
        (drive, true) => {
            tracing::info!("Dry run: nothing will be uploaded");
            Ok(Arc::new(DryRunRemote::new(drive)))
        },
        (Some(drive), false) => Ok(drive),
        (None, false) => exn::bail!(ErrorKind::NoCredentials),
    }
}

/// Find ffmpeg. Only required when media is archived; lyrics never need it.
fn transcoder(config: &Config, required: bool) -> Result<TranscoderHandle> {
    let ffmpeg = match &config.transcode.ffmpeg {
        Some(path) => Ffmpeg::with_path(path),
        None if required => Ffmpeg::discover().or_raise(|| ErrorKind::Transcoder)?,
        None => Ffmpeg::with_path("ffmpeg"),
    };
    Ok(Arc::new(ffmpeg))
}
