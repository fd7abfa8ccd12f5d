//! Chat history sources.
//!
//! A live chat service is reached through two phases: [`establish`] runs the
//! interactive login (surfacing [`LoginChallenge`]s to the operator) and hands
//! back a [`ChatHandle`]; the handle is then used to page backwards through a
//! group's [`ChatHistory`]. Nothing past the login phase knows about QR codes
//! or prompts.

pub mod error;
#[cfg(feature = "mock")]
mod mock;
mod models;
mod session;

#[cfg(feature = "mock")]
pub use crate::mock::{MockConnector, MockHistory};
pub use crate::models::{Group, GroupId, Media, Message, MessageId};
pub use crate::session::{Connector, LoginChallenge, establish};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type ChatHandle = Arc<dyn ChatHistory + Send + Sync>;

/// Read access to an authenticated chat session.
#[async_trait]
pub trait ChatHistory: Send + Sync {
    /// Find a group chat by its exact display name. Direct chats never match.
    async fn find_group(&self, name: &str) -> Result<Option<Group>>;

    /// Fetch up to `limit` messages older than `before` (or the newest
    /// messages when `before` is `None`), ordered newest first.
    ///
    /// An empty page means the start of the history has been reached.
    async fn fetch_messages_before(
        &self,
        group: &Group,
        before: Option<&MessageId>,
        limit: usize,
    ) -> Result<Vec<Message>>;

    /// Download the media payload attached to a message.
    async fn download_media(&self, message: &Message) -> Result<Media>;
}
