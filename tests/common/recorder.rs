//! Chat transport that records every outbound interaction.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tocadora::chat::transport::{ChatId, ChatTransport, MediaPayload, MessageId};

/// One outbound interaction the pipeline made through the transport.
#[derive(Debug, Clone)]
pub enum Outbound {
    Text {
        chat: String,
        text: String,
        quote: Option<String>,
    },
    Preview {
        chat: String,
        caption: String,
        thumbnail: Option<String>,
        quote: String,
        id: String,
    },
    Reaction {
        chat: String,
        target: String,
        emoji: String,
    },
    Media {
        chat: String,
        payload: MediaPayload,
        quote: Option<String>,
    },
}

/// Transport stub handing out sequential message ids and recording calls.
#[derive(Default)]
pub struct RecordingTransport {
    counter: AtomicU64,
    sent: Mutex<Vec<Outbound>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> MessageId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        MessageId(format!("m-{}", n))
    }

    fn record(&self, item: Outbound) {
        self.sent.lock().unwrap().push(item);
    }

    /// Everything sent so far, in order.
    pub fn outbound(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    /// Text bodies sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.outbound()
            .into_iter()
            .filter_map(|item| match item {
                Outbound::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// (target message id, emoji) pairs in reaction order.
    pub fn reactions(&self) -> Vec<(String, String)> {
        self.outbound()
            .into_iter()
            .filter_map(|item| match item {
                Outbound::Reaction { target, emoji, .. } => Some((target, emoji)),
                _ => None,
            })
            .collect()
    }

    /// Emoji reacted onto one specific message, in order.
    pub fn reactions_on(&self, target: &MessageId) -> Vec<String> {
        self.reactions()
            .into_iter()
            .filter(|(t, _)| t == &target.0)
            .map(|(_, emoji)| emoji)
            .collect()
    }

    /// Media payloads sent so far, in order.
    pub fn media(&self) -> Vec<MediaPayload> {
        self.outbound()
            .into_iter()
            .filter_map(|item| match item {
                Outbound::Media { payload, .. } => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Message ids of previews sent so far, in order.
    pub fn preview_ids(&self) -> Vec<MessageId> {
        self.outbound()
            .into_iter()
            .filter_map(|item| match item {
                Outbound::Preview { id, .. } => Some(MessageId(id)),
                _ => None,
            })
            .collect()
    }

    /// Caption of the `n`-th preview sent.
    pub fn preview_caption(&self, n: usize) -> Option<String> {
        self.outbound()
            .into_iter()
            .filter_map(|item| match item {
                Outbound::Preview { caption, .. } => Some(caption),
                _ => None,
            })
            .nth(n)
    }

    /// Total number of outbound interactions of any kind.
    pub fn interaction_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(
        &self,
        chat: &ChatId,
        text: &str,
        quote: Option<&MessageId>,
    ) -> anyhow::Result<MessageId> {
        let id = self.next_id();
        self.record(Outbound::Text {
            chat: chat.0.clone(),
            text: text.to_string(),
            quote: quote.map(|q| q.0.clone()),
        });
        Ok(id)
    }

    async fn send_preview(
        &self,
        chat: &ChatId,
        caption: &str,
        thumbnail_url: Option<&str>,
        quote: &MessageId,
    ) -> anyhow::Result<MessageId> {
        let id = self.next_id();
        self.record(Outbound::Preview {
            chat: chat.0.clone(),
            caption: caption.to_string(),
            thumbnail: thumbnail_url.map(str::to_string),
            quote: quote.0.clone(),
            id: id.0.clone(),
        });
        Ok(id)
    }

    async fn react(&self, chat: &ChatId, target: &MessageId, emoji: &str) -> anyhow::Result<()> {
        self.record(Outbound::Reaction {
            chat: chat.0.clone(),
            target: target.0.clone(),
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &ChatId,
        payload: MediaPayload,
        quote: Option<&MessageId>,
    ) -> anyhow::Result<()> {
        self.record(Outbound::Media {
            chat: chat.0.clone(),
            payload,
            quote: quote.map(|q| q.0.clone()),
        });
        Ok(())
    }
}
