//! Chat transport seam and event types.
//!
//! The pipeline drives the messaging platform through the `ChatTransport`
//! trait alone. This module has zero platform dependency: identifiers are
//! opaque newtypes and inbound activity arrives as plain structs, so tests
//! and alternative transports plug in without touching pipeline code.

use std::path::PathBuf;

use async_trait::async_trait;

/// Conversation identifier, opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatId(pub String);

/// Message identifier within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

/// Identity of a message author.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An incoming media request command.
#[derive(Debug, Clone)]
pub struct PlayCommand {
    pub chat: ChatId,
    pub sender: UserId,
    /// The command message itself; status reactions and replies target it.
    pub message_id: MessageId,
    pub query: String,
}

/// Inbound activity that may carry a format choice.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A text message quoting an earlier message.
    Reply {
        chat: ChatId,
        sender: UserId,
        /// Message id the reply quotes.
        quoted: MessageId,
        text: String,
    },
    /// An emoji reaction placed on an earlier message.
    Reaction {
        chat: ChatId,
        sender: UserId,
        /// Message id the reaction targets.
        target: MessageId,
        emoji: String,
    },
}

impl ChatEvent {
    /// Message id the event points at, used to look up a pending preview.
    pub fn target_message(&self) -> &MessageId {
        match self {
            Self::Reply { quoted, .. } => quoted,
            Self::Reaction { target, .. } => target,
        }
    }

    pub fn sender(&self) -> &UserId {
        match self {
            Self::Reply { sender, .. } | Self::Reaction { sender, .. } => sender,
        }
    }
}

/// A verified artifact packaged for sending.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub path: PathBuf,
    /// `audio/mpeg` or `video/mp4`.
    pub mime: &'static str,
    /// Display filename derived from the sanitized title.
    pub file_name: String,
    /// Title caption for inline-playable sends; documents carry only the
    /// filename.
    pub caption: Option<String>,
    /// Send as a generic document instead of an inline-playable message.
    pub as_document: bool,
}

/// Outbound side of the messaging platform.
///
/// All methods are `&self`; implementations hold their own connection
/// state. Failures are opaque to the pipeline, which decides per call
/// whether to surface or swallow them.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a text message, optionally quoting another message.
    async fn send_text(
        &self,
        chat: &ChatId,
        text: &str,
        quote: Option<&MessageId>,
    ) -> anyhow::Result<MessageId>;

    /// Sends the preview card (caption plus optional thumbnail), quoting the
    /// command message. Returns the preview's message id, which choice
    /// events will reference.
    async fn send_preview(
        &self,
        chat: &ChatId,
        caption: &str,
        thumbnail_url: Option<&str>,
        quote: &MessageId,
    ) -> anyhow::Result<MessageId>;

    /// Places an emoji reaction on a message.
    async fn react(&self, chat: &ChatId, target: &MessageId, emoji: &str) -> anyhow::Result<()>;

    /// Sends a media file, optionally quoting the originating message.
    async fn send_media(
        &self,
        chat: &ChatId,
        payload: MediaPayload,
        quote: Option<&MessageId>,
    ) -> anyhow::Result<()>;
}
