//! In-memory chat history for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{Group, GroupId, Media, Message, MessageId};
use crate::session::{Connector, LoginChallenge};
use crate::{ChatHandle, ChatHistory};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

/// In-memory chat history.
///
/// Messages are stored oldest first per group and served newest first, the
/// same way a chat service pages backwards through a conversation. Every
/// fetch is recorded so tests can assert on the paging pattern.
#[derive(Debug, Default)]
pub struct MockHistory {
    groups: Vec<Group>,
    direct_chats: Vec<String>,
    messages: HashMap<GroupId, Vec<Message>>,
    media: HashMap<MessageId, Media>,
    failing_fetches: HashSet<usize>,
    failing_downloads: HashSet<MessageId>,
    fetches: AtomicUsize,
    pages: RwLock<Vec<usize>>,
}

impl MockHistory {
    /// Add a group chat with its messages, oldest first.
    pub fn with_group(mut self, id: impl Into<String>, name: impl Into<String>, messages: Vec<Message>) -> Self {
        let group = Group { id: GroupId::new(id), name: name.into() };
        self.messages.insert(group.id.clone(), messages);
        self.groups.push(group);
        self
    }

    /// Add a direct (one-to-one) chat; these are never returned by
    /// [`find_group`](ChatHistory::find_group).
    pub fn with_direct_chat(mut self, name: impl Into<String>) -> Self {
        self.direct_chats.push(name.into());
        self
    }

    /// Attach a downloadable payload to a message.
    pub fn with_media(mut self, id: impl Into<String>, media: Media) -> Self {
        self.media.insert(MessageId::new(id), media);
        self
    }

    /// Make the given fetches fail (1-based, counting every call).
    pub fn with_failing_fetches(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_fetches.extend(calls);
        self
    }

    /// Make downloading the payload of this message fail.
    pub fn with_failing_download(mut self, id: impl Into<String>) -> Self {
        self.failing_downloads.insert(MessageId::new(id));
        self
    }

    /// Number of messages returned by each successful fetch, in call order.
    pub async fn page_sizes(&self) -> Vec<usize> {
        self.pages.read().await.clone()
    }

    /// Number of fetches made so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatHistory for MockHistory {
    async fn find_group(&self, name: &str) -> Result<Option<Group>> {
        Ok(self.groups.iter().find(|g| g.name == name).cloned())
    }

    async fn fetch_messages_before(
        &self,
        group: &Group,
        before: Option<&MessageId>,
        limit: usize,
    ) -> Result<Vec<Message>> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_fetches.contains(&call) {
            exn::bail!(ErrorKind::Fetch(format!("fetch {call} failed")));
        }
        let messages = self
            .messages
            .get(&group.id)
            .ok_or_else(|| ErrorKind::Fetch(format!("unknown group {}", group.id)))?;
        let end = match before {
            None => messages.len(),
            Some(cursor) => messages
                .iter()
                .position(|m| &m.id == cursor)
                .ok_or_else(|| ErrorKind::Fetch(format!("unknown cursor {cursor}")))?,
        };
        let start = end.saturating_sub(limit);
        let page: Vec<Message> = messages[start..end].iter().rev().cloned().collect();
        self.pages.write().await.push(page.len());
        Ok(page)
    }

    async fn download_media(&self, message: &Message) -> Result<Media> {
        if self.failing_downloads.contains(&message.id) {
            exn::bail!(ErrorKind::Download(message.id.to_string()));
        }
        Ok(self
            .media
            .get(&message.id)
            .cloned()
            .ok_or_else(|| ErrorKind::Download(message.id.to_string()))?)
    }
}

/// Connector that replays a fixed list of login challenges.
pub struct MockConnector {
    handle: Option<ChatHandle>,
    challenges: Vec<String>,
}

impl MockConnector {
    /// A connector whose login succeeds with `handle`.
    pub fn new(handle: ChatHandle) -> Self {
        Self { handle: Some(handle), challenges: Vec::new() }
    }

    /// A connector whose login is never confirmed.
    pub fn rejecting() -> Self {
        Self { handle: None, challenges: Vec::new() }
    }

    pub fn with_challenges<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.challenges.extend(codes.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, challenges: UnboundedSender<LoginChallenge>) -> Result<ChatHandle> {
        for code in &self.challenges {
            challenges.send(LoginChallenge { code: code.clone() }).map_err(|_| ErrorKind::Disconnected)?;
        }
        match &self.handle {
            Some(handle) => Ok(handle.clone()),
            None => exn::bail!(ErrorKind::Authentication("login challenge expired".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<Message> {
        (1..=count).map(|n| Message::media(format!("m{n}"))).collect()
    }

    #[tokio::test]
    async fn test_paging_newest_first() {
        let history = MockHistory::default().with_group("g1", "Coral", numbered(5));
        let group = history.find_group("Coral").await.unwrap().unwrap();

        let first = history.fetch_messages_before(&group, None, 2).await.unwrap();
        let ids: Vec<_> = first.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m5", "m4"]);

        let second = history.fetch_messages_before(&group, Some(&first[1].id), 2).await.unwrap();
        let ids: Vec<_> = second.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m2"]);

        let third = history.fetch_messages_before(&group, Some(&second[1].id), 2).await.unwrap();
        assert_eq!(third.len(), 1);
        let last = history.fetch_messages_before(&group, Some(&third[0].id), 2).await.unwrap();
        assert!(last.is_empty());
        assert_eq!(history.page_sizes().await, vec![2, 2, 1, 0]);
    }

    #[tokio::test]
    async fn test_direct_chats_are_not_groups() {
        let history = MockHistory::default().with_direct_chat("Maria");
        assert!(history.find_group("Maria").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_fetch_and_download() {
        let history = MockHistory::default()
            .with_group("g1", "Coral", numbered(3))
            .with_failing_fetches([1])
            .with_failing_download("m2");
        let group = history.find_group("Coral").await.unwrap().unwrap();
        assert!(history.fetch_messages_before(&group, None, 10).await.is_err());
        assert_eq!(history.fetch_messages_before(&group, None, 10).await.unwrap().len(), 3);
        assert_eq!(history.fetch_count(), 2);
        let err = history.download_media(&Message::media("m2")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Download(_)));
    }
}
