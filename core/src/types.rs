//! Core types and identifiers used throughout the system

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix of every synthetic reply
pub const REPLY_PREFIX: &str = "I am Reply Message with ";

/// Message identifier, assigned by the store
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Voice relay request identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
#[serde(transparent)]
pub struct VoiceId(pub Uuid);

impl VoiceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted chat message.
///
/// Only the store creates messages; there is no way to change one after
/// creation, so the fields are private and exposed through accessors.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Message {
    id: MessageId,
    text: String,
    user: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(text: String, user: String) -> Self {
        Self {
            id: MessageId::new(),
            text,
            user,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Synthetic reply emitted after a message was announced
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Reply {
    pub text: String,
}

impl Reply {
    /// Build the canned reply for `message`
    pub fn to(message: &Message) -> Self {
        Self::for_text(message.text())
    }

    pub fn for_text(text: &str) -> Self {
        Self {
            text: format!("{}{}", REPLY_PREFIX, text),
        }
    }
}

/// Raw audio uploaded by a client. Never persisted.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct VoicePayload(Bytes);

impl VoicePayload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self(data.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<Vec<u8>> for VoicePayload {
    fn from(data: Vec<u8>) -> Self {
        Self(Bytes::from(data))
    }
}
