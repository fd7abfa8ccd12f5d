use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, about = "Archive a chat group's media into local folders and a mirrored remote tree")]
pub struct Cli {
    /// Configuration file (defaults to hoard.toml in the platform config directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Increase verbosity (-v, -vv). Default INFO.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Decrease verbosity (-q, -qq).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
    /// Log uploads and folder creations instead of performing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Export lyrics from the chat transcript, then archive every media file
    Backup(Source),
    /// Only export lyrics from the chat transcript
    Lyrics(Source),
    /// Only archive media files
    Media(Source),
}

#[derive(Debug, clap::Args, PartialEq, Eq)]
pub struct Source {
    /// Backup directory (overrides source.backup_dir)
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

impl Command {
    pub fn source(&self) -> &Source {
        match self {
            Self::Backup(source) | Self::Lyrics(source) | Self::Media(source) => source,
        }
    }

    pub fn exports_lyrics(&self) -> bool {
        matches!(self, Self::Backup(_) | Self::Lyrics(_))
    }

    pub fn archives_media(&self) -> bool {
        matches!(self, Self::Backup(_) | Self::Media(_))
    }
}

impl Cli {
    pub fn level(&self) -> Level {
        match (2 + i16::from(self.verbose) - i16::from(self.quiet)).max(0) {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
