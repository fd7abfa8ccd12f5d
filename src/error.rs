use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors; anything that ends up here stops the process.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("unable to load configuration")]
    Config,
    #[display("no backup directory configured (set source.backup_dir or pass --dir)")]
    NoBackupDir,
    #[display("no remote credentials configured (set remote.credentials or pass --dry-run)")]
    NoCredentials,
    #[display("unable to open the local archive")]
    LocalArchive,
    #[display("unable to connect to the remote store")]
    Remote,
    #[display("unable to find ffmpeg")]
    Transcoder,
    #[display("unable to archive lyrics")]
    Lyrics,
    #[display("unable to archive media")]
    Media,
}
