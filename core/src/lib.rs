//! Echo Chat Core Library
//!
//! Building blocks for a small realtime chat service: text messages are
//! persisted, announced to every connected listener and answered with a
//! canned reply after a configured delay; voice messages are played on the
//! host and rebroadcast as raw audio.

pub mod broadcast;
pub mod config;
pub mod storage;
pub mod types;
pub mod voice;

pub use broadcast::{BroadcastChannel, Listener, ListenerId, ListenerRegistry, ServerEvent};
pub use config::{ChatConfig, PlayerConfig};
pub use storage::{MessageStore, Store};
pub use types::*;
pub use voice::{AudioPlayer, CommandPlayer, NullPlayer, VoiceRelay, VoiceTicket};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
