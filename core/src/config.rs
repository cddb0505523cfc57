//! Runtime configuration shared by the chat components

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Delay between announcing a message and sending its reply
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Largest accepted voice upload (10 MiB)
pub const DEFAULT_MAX_VOICE_BYTES: usize = 10 * 1024 * 1024;

/// How voice messages are played on the host
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlayerConfig {
    /// Use the first known player found on `PATH`
    #[default]
    Auto,
    /// Run a specific program with the audio file appended to `args`
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Skip playback entirely
    Disabled,
}

impl PlayerConfig {
    /// Parse a command-line value: `auto`, `none`, or a program name.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "auto" => Self::Auto,
            "none" | "off" | "disabled" => Self::Disabled,
            program => Self::Command {
                program: program.to_string(),
                args: Vec::new(),
            },
        }
    }
}

/// Chat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Delay before the canned reply is published
    #[serde(with = "duration_ms")]
    pub reply_delay: Duration,

    /// Upper bound on one voice payload
    pub max_voice_bytes: usize,

    /// Directory for transient voice files
    pub voice_temp_dir: PathBuf,

    pub player: PlayerConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            max_voice_bytes: DEFAULT_MAX_VOICE_BYTES,
            voice_temp_dir: std::env::temp_dir(),
            player: PlayerConfig::Auto,
        }
    }
}

impl ChatConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_voice_bytes == 0 {
            return Err(Error::Config("max_voice_bytes must be greater than zero".to_string()));
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.reply_delay, Duration::from_secs(1));
        assert_eq!(config.player, PlayerConfig::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_voice_limit_is_rejected() {
        let config = ChatConfig {
            max_voice_bytes: 0,
            ..ChatConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: ChatConfig =
            serde_json::from_str(r#"{ "reply_delay": 10000, "player": { "kind": "disabled" } }"#)
                .unwrap();

        assert_eq!(config.reply_delay, Duration::from_secs(10));
        assert_eq!(config.player, PlayerConfig::Disabled);
        assert_eq!(config.max_voice_bytes, DEFAULT_MAX_VOICE_BYTES);
    }

    #[test]
    fn test_parse_player() {
        assert_eq!(PlayerConfig::parse("auto"), PlayerConfig::Auto);
        assert_eq!(PlayerConfig::parse("none"), PlayerConfig::Disabled);
        assert_eq!(
            PlayerConfig::parse("mpg123"),
            PlayerConfig::Command { program: "mpg123".to_string(), args: vec![] }
        );
    }
}
