//! Command-line and environment configuration

use clap::Parser;
use echochat_core::{config::DEFAULT_MAX_VOICE_BYTES, ChatConfig, PlayerConfig, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Echo chat server
#[derive(Debug, Clone, Parser)]
#[command(name = "echochat-server", version, about)]
pub struct Args {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// RocksDB directory for stored messages
    #[arg(long, env = "ECHOCHAT_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Delay before the canned reply, in milliseconds
    #[arg(long, env = "REPLY_DELAY_MS", default_value_t = 1000)]
    pub reply_delay_ms: u64,

    /// Origins allowed by CORS
    #[arg(
        long = "allowed-origin",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:5000"
    )]
    pub allowed_origins: Vec<String>,

    /// Largest accepted voice upload, in bytes
    #[arg(long, env = "MAX_VOICE_BYTES", default_value_t = DEFAULT_MAX_VOICE_BYTES)]
    pub max_voice_bytes: usize,

    /// Directory for transient voice files (defaults to the system temp dir)
    #[arg(long, env = "VOICE_TEMP_DIR")]
    pub voice_temp_dir: Option<PathBuf>,

    /// Audio player: `auto`, `none`, or a program name
    #[arg(long, env = "AUDIO_PLAYER", default_value = "auto")]
    pub player: String,

    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = "echochat_server=info,echochat_core=info,tower_http=info")]
    pub log_filter: String,
}

impl Args {
    /// Build and validate the core configuration
    pub fn chat_config(&self) -> Result<ChatConfig> {
        let defaults = ChatConfig::default();
        let config = ChatConfig {
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            max_voice_bytes: self.max_voice_bytes,
            voice_temp_dir: self.voice_temp_dir.clone().unwrap_or(defaults.voice_temp_dir),
            player: PlayerConfig::parse(&self.player),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
