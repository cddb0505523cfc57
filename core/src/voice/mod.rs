//! Voice relay
//!
//! A voice upload is broadcast to every listener and accepted immediately.
//! Server-side playback runs on its own task: the payload is written to a
//! per-request transient file, played, and the file removed again. The
//! playback outcome is only reported through a follow-up `playbackStatus`
//! event.

pub mod player;

use crate::broadcast::{BroadcastChannel, ServerEvent};
use crate::config::ChatConfig;
use crate::types::{VoiceId, VoicePayload};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use player::{AudioPlayer, CommandPlayer, NullPlayer};

/// Receipt for an accepted voice upload
#[derive(Debug)]
pub struct VoiceTicket {
    pub id: VoiceId,
    /// Listeners the `voiceMessage` event reached
    pub listeners: usize,
    playback: JoinHandle<Result<()>>,
}

impl VoiceTicket {
    /// Wait until playback and cleanup are done
    pub async fn playback_finished(self) -> Result<()> {
        self.playback
            .await
            .map_err(|e| Error::Playback(format!("Playback task failed: {}", e)))?
    }
}

/// Relays voice uploads to listeners and the local player
#[derive(Clone)]
pub struct VoiceRelay {
    channel: BroadcastChannel,
    player: Arc<dyn AudioPlayer>,
    temp_dir: PathBuf,
    max_bytes: usize,
}

impl VoiceRelay {
    pub fn new(channel: BroadcastChannel, player: Arc<dyn AudioPlayer>, config: &ChatConfig) -> Self {
        Self {
            channel,
            player,
            temp_dir: config.voice_temp_dir.clone(),
            max_bytes: config.max_voice_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Broadcast `payload` and start playback in the background
    pub async fn relay(&self, payload: VoicePayload) -> Result<VoiceTicket> {
        if payload.is_empty() {
            return Err(Error::Upload("audio payload is empty".to_string()));
        }
        if payload.len() > self.max_bytes {
            return Err(Error::Upload(format!(
                "audio payload is {} bytes, limit is {}",
                payload.len(),
                self.max_bytes
            )));
        }

        let id = VoiceId::new();
        let listeners = self.channel.emit(ServerEvent::voice(id, payload.clone())).await;
        info!("Relayed voice message {} ({} bytes) to {} listener(s)", id, payload.len(), listeners);

        let playback = tokio::spawn(play_and_report(
            self.channel.clone(),
            self.player.clone(),
            self.temp_dir.clone(),
            id,
            payload,
        ));

        Ok(VoiceTicket { id, listeners, playback })
    }
}

async fn play_and_report(
    channel: BroadcastChannel,
    player: Arc<dyn AudioPlayer>,
    temp_dir: PathBuf,
    id: VoiceId,
    payload: VoicePayload,
) -> Result<()> {
    let result = play_transient(player.as_ref(), &temp_dir, id, &payload).await;

    let status = match &result {
        Ok(()) => {
            info!("Voice message {} played with {}", id, player.name());
            ServerEvent::PlaybackStatus { id, ok: true, error: None }
        }
        Err(e) => {
            error!("Error playing voice message {}: {}", id, e);
            ServerEvent::PlaybackStatus { id, ok: false, error: Some(e.to_string()) }
        }
    };
    channel.emit(status).await;

    result
}

/// Write the payload to its own transient file, play it, then remove it
async fn play_transient(
    player: &dyn AudioPlayer,
    temp_dir: &Path,
    id: VoiceId,
    payload: &VoicePayload,
) -> Result<()> {
    let path = transient_path(temp_dir, id);

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(|e| Error::Playback(format!("Failed to create {}: {}", path.display(), e)))?;

    let written = async {
        file.write_all(payload.as_bytes()).await?;
        file.flush().await
    }
    .await;
    drop(file);

    let result = match written {
        Ok(()) => player.play(&path).await,
        Err(e) => Err(Error::Playback(format!("Failed to write {}: {}", path.display(), e))),
    };

    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Error deleting transient file {}: {}", path.display(), e);
    }

    result
}

/// Transient file for one voice request
pub fn transient_path(temp_dir: &Path, id: VoiceId) -> PathBuf {
    temp_dir.join(format!("voice-{}.mp3", id))
}
