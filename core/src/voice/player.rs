//! Local audio playback

use crate::config::PlayerConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{info, warn};

/// Command-line players tried in order when the config says `auto`
pub const KNOWN_PLAYERS: &[&str] = &[
    "mpg123", "mpg321", "mplayer", "afplay", "play", "aplay", "cvlc", "cmdmp3",
];

/// Plays an audio file to completion
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, path: &Path) -> Result<()>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Build the player described by `config`
pub fn from_config(config: &PlayerConfig) -> Arc<dyn AudioPlayer> {
    match config {
        PlayerConfig::Auto => match CommandPlayer::detect() {
            Some(player) => {
                info!("Using audio player {}", player.name());
                Arc::new(player)
            }
            None => {
                warn!("No audio player found on PATH, playback disabled");
                Arc::new(NullPlayer)
            }
        },
        PlayerConfig::Command { program, args } => {
            Arc::new(CommandPlayer::new(program).with_args(args.clone()))
        }
        PlayerConfig::Disabled => Arc::new(NullPlayer),
    }
}

/// Plays audio by running an external program with the file path as last argument
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// First entry of [`KNOWN_PLAYERS`] present on `PATH`
    pub fn detect() -> Option<Self> {
        let path = std::env::var_os("PATH")?;
        let dirs: Vec<PathBuf> = std::env::split_paths(&path).collect();

        KNOWN_PLAYERS
            .iter()
            .find(|program| dirs.iter().any(|dir| dir.join(program).is_file()))
            .map(|program| Self::new(*program))
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Playback(format!("Failed to run {}: {}", self.program, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::Playback(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )))
        }
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Player used when playback is turned off; every call fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlayer;

#[async_trait]
impl AudioPlayer for NullPlayer {
    async fn play(&self, _path: &Path) -> Result<()> {
        Err(Error::Playback("playback disabled".to_string()))
    }

    fn name(&self) -> &str {
        "none"
    }
}
