use derive_more::{Display, From};

/// Identifier of a group chat, as issued by the chat service.
#[derive(Debug, Clone, Display, From, PartialEq, Eq, Hash)]
pub struct GroupId(String);
impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Serialized identifier of a single message. Used as the pagination cursor.
#[derive(Debug, Clone, Display, From, PartialEq, Eq, Hash)]
pub struct MessageId(String);
impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Whether a media payload can be downloaded for this message.
    pub has_media: bool,
    pub body: Option<String>,
}
impl Message {
    pub fn text(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self { id: MessageId::new(id), has_media: false, body: Some(body.into()) }
    }

    pub fn media(id: impl Into<String>) -> Self {
        Self { id: MessageId::new(id), has_media: true, body: None }
    }
}

/// A downloaded media payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// MIME type declared by the chat service (`audio/ogg; codecs=opus`, ...)
    pub mime_type: String,
    /// Original file name, when the sender attached one
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}
