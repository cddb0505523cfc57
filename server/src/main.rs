//! Echo Chat Server
//!
//! Stores text messages, broadcasts them over WebSocket with a delayed canned
//! reply, and relays voice uploads to every connected client.

use clap::Parser;
use echochat_core::{voice::player, Store};
use echochat_server::{app, config::Args, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&args.log_filter))
        .init();

    info!("🚀 Starting Echo Chat Server");

    let config = args.chat_config()?;

    std::fs::create_dir_all(&args.data_dir)?;
    let store = Store::open(&args.data_dir)?;
    info!("📁 Message store: {:?}", args.data_dir);

    let player = player::from_config(&config.player);
    let state = AppState::new(Arc::new(store), player, &config);
    info!("⏱️  Reply delay: {:?}", state.channel.reply_delay());
    let app = app(state, &args.allowed_origins);

    let addr = args.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🎯 Server running on http://{}", addr);
    info!("💡 WebSocket at ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C, shutting down...");
        })
        .await?;

    info!("✅ Server shut down gracefully");
    Ok(())
}
