//! Chat message records

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ner::GroupedEntity;

/// Time-ordered unique message id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn next() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Bot => "bot",
            Self::System => "system",
        }
    }
}

/// One entry in a chat transcript. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    text: String,
    sender: Sender,
    timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<GroupedEntity>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::next(),
            text: text.into(),
            sender,
            timestamp: Local::now(),
            entities: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Sender::System, text)
    }

    /// Attach grouped NER entities (consumes the message, so it stays immutable once shared)
    pub fn with_entities(mut self, entities: Vec<GroupedEntity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn entities(&self) -> &[GroupedEntity] {
        &self.entities
    }

    /// `HH:MM` as shown next to each message
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}
