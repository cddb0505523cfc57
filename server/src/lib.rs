//! Echo Chat Server
//!
//! HTTP and WebSocket front end for `echochat-core`: a REST API for text and
//! voice submissions and a `/ws` endpoint streaming server events.

pub mod config;
pub mod error;
pub mod routes;
pub mod ws;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use echochat_core::{BroadcastChannel, ChatConfig, ListenerRegistry, MessageStore, VoiceRelay};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Extra room on top of the audio limit for multipart framing
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
    pub channel: BroadcastChannel,
    pub voice: VoiceRelay,
}

impl AppState {
    /// Wire the components together around one listener registry
    pub fn new(
        store: Arc<dyn MessageStore>,
        player: Arc<dyn echochat_core::AudioPlayer>,
        config: &ChatConfig,
    ) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        let channel = BroadcastChannel::new(registry, config.reply_delay);
        let voice = VoiceRelay::new(channel.clone(), player, config);

        Self { store, channel, voice }
    }

    pub fn registry(&self) -> &Arc<ListenerRegistry> {
        self.channel.registry()
    }
}

/// Build the router
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    let voice_limit = state.voice.max_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/ws", get(ws::websocket_handler))
        .route("/api/health", get(routes::health))
        .route("/api/message", post(routes::send_message))
        .route("/api/message/:id", get(routes::get_message))
        .route(
            "/api/voice",
            post(routes::voice_message).layer(DefaultBodyLimit::max(voice_limit)),
        )
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
