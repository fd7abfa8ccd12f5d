use crate::archive::{Archiver, UploadResult};
use crate::error::Result;
use crate::item::MediaItem;
use async_stream::stream;
use futures::{Stream, StreamExt};

/// Progress events emitted by [`Archiver::run`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Archived`](Self::Archived): zero or more times, one per item that
///    made it all the way to the remote store.
/// 3. [`Complete`](Self::Complete): exactly once, at the end.
///
/// Items that fail are yielded as `Err` between those events; they never end
/// the stream.
#[derive(Debug)]
pub enum ArchiveEvent {
    Started,
    Archived(UploadResult),
    Complete(Summary),
}

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub archived: usize,
    pub failed: usize,
}

impl Archiver {
    /// Archive every item of `items`, one at a time, in order.
    pub fn run<'a, S>(&'a self, items: S) -> impl Stream<Item = Result<ArchiveEvent>> + 'a
    where
        S: Stream<Item = Result<MediaItem>> + 'a,
    {
        stream! {
            yield Ok(ArchiveEvent::Started);
            let mut summary = Summary::default();
            let mut items = std::pin::pin!(items);
            while let Some(item) = items.next().await {
                let item = match item {
                    Ok(item) => item,
                    Err(e) => {
                        tracing::warn!(error = ?e, "Skipping item that couldn't be read");
                        summary.failed += 1;
                        yield Err(e);
                        continue;
                    },
                };
                let source = item.source.clone();
                match self.process(item).await {
                    Ok(result) => {
                        summary.archived += 1;
                        yield Ok(ArchiveEvent::Archived(result));
                    },
                    Err(e) => {
                        tracing::warn!(source = %source, error = ?e, "Unable to archive item");
                        summary.failed += 1;
                        yield Err(e);
                    },
                }
            }
            tracing::info!(archived = summary.archived, failed = summary.failed, "Archive run complete");
            yield Ok(ArchiveEvent::Complete(summary));
        }
    }
}
