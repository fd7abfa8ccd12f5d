use crate::error::{ErrorKind, Result};
use crate::item::MediaItem;
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::path::PathBuf;
use tokio::fs;

/// Stream every regular file directly inside `dir`, in directory listing
/// order. Sub-directories are skipped, not descended into.
pub async fn backup_items(dir: impl Into<PathBuf>) -> Result<impl Stream<Item = Result<MediaItem>>> {
    let dir = dir.into();
    if !fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
        exn::bail!(ErrorKind::SourceNotFound(dir.display().to_string()));
    }
    let mut entries = fs::read_dir(&dir).await.or_raise(|| ErrorKind::Source)?;
    tracing::info!(dir = %dir.display(), "Reading backup directory");

    Ok(stream! {
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    yield Err::<MediaItem, _>(e).or_raise(|| ErrorKind::Source);
                    break;
                },
            };
            let path = entry.path();
            // Follows symlinks, unlike `DirEntry::file_type`.
            match fs::metadata(&path).await {
                Ok(metadata) if metadata.is_file() => yield Ok(MediaItem::from_path(path)),
                Ok(_) => tracing::debug!(path = %path.display(), "Skipping backup entry that isn't a file"),
                Err(e) => yield Err::<MediaItem, _>(e).or_raise(|| ErrorKind::Source),
            }
        }
    })
}
