use crate::error::{ErrorKind, Result};
use crate::item::MediaItem;
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use hoard_chat::{ChatHandle, MessageId};
use hoard_config::SourceConfig;
use tracing::instrument;

/// [`history_items`] for the group and page size set in the configuration.
pub async fn configured_history(
    chat: ChatHandle,
    source: &SourceConfig,
) -> Result<impl Stream<Item = Result<MediaItem>>> {
    let Some(group) = source.group.clone() else {
        exn::bail!(ErrorKind::SourceNotFound("no group chat configured".to_string()));
    };
    history_items(chat, group, source.page_size).await
}

/// Stream the media of a group chat, newest first.
///
/// History is fetched `page_size` messages at a time, each page older than
/// the oldest message seen so far, until a page comes back empty. A failed
/// fetch ends the stream early (with a warning saying how far it got) instead
/// of failing the run. Messages without media are skipped; a failed download
/// is yielded as an error for that message only.
#[instrument(skip_all, fields(page_size = page_size))]
pub async fn history_items(
    chat: ChatHandle,
    group: impl Into<String>,
    page_size: usize,
) -> Result<impl Stream<Item = Result<MediaItem>>> {
    let name = group.into();
    let Some(group) = chat.find_group(&name).await.or_raise(|| ErrorKind::Source)? else {
        exn::bail!(ErrorKind::SourceNotFound(format!("group {name:?}")));
    };
    tracing::info!(group = %group.name, id = %group.id, "Found group chat");

    Ok(stream! {
        let mut cursor: Option<MessageId> = None;
        let mut collected = 0_usize;
        loop {
            let page = match chat.fetch_messages_before(&group, cursor.as_ref(), page_size).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(error = ?e, collected, "Unable to fetch more messages, stopping early");
                    break;
                },
            };
            // Pages are newest first: the last message is the oldest.
            let Some(oldest) = page.last() else {
                break;
            };
            cursor = Some(oldest.id.clone());
            collected += page.len();
            tracing::debug!(fetched = page.len(), collected, "Fetched page of messages");

            for message in page.into_iter().filter(|m| m.has_media) {
                match chat.download_media(&message).await {
                    Ok(media) => yield Ok(MediaItem::from_media(message.id, media)),
                    Err(e) => yield Err(e).or_raise(|| ErrorKind::Source),
                }
            }
        }
        tracing::info!(collected, "Finished reading chat history");
    })
}
