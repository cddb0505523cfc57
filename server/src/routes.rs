//! REST handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use echochat_core::{Error, Message, MessageId, VoicePayload, VoiceId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio";

/// Body of `POST /api/message`
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: String,
}

/// Body of a successful `POST /api/voice`
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub message: String,
    pub id: VoiceId,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub listeners: usize,
}

/// Persist a text message, announce it and schedule its reply
pub async fn send_message(
    State(state): State<AppState>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::message(Error::Validation(e.body_text())))?;

    let store = state.store.clone();
    let message = tokio::task::spawn_blocking(move || store.save(&request.text, &request.user))
        .await
        .map_err(|e| ApiError::message(Error::Storage(format!("Store task failed: {}", e))))?
        .map_err(ApiError::message)?;

    info!("📝 Stored message {} from {}", message.id(), message.user());
    state.channel.submit(&message).await;

    Ok((StatusCode::CREATED, Json(message)))
}

/// Fetch a stored message
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = MessageId::from_string(&id).map_err(|_| ApiError::not_found())?;

    let store = state.store.clone();
    let found = tokio::task::spawn_blocking(move || store.get(&id))
        .await
        .map_err(|e| ApiError::message(Error::Storage(format!("Store task failed: {}", e))))?
        .map_err(ApiError::message)?;

    found.map(Json).ok_or_else(ApiError::not_found)
}

/// Accept a voice recording, broadcast it and start local playback
pub async fn voice_message(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VoiceResponse>, ApiError> {
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::voice(Error::Upload(e.body_text())))?
    {
        if field.name() == Some(AUDIO_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::voice(Error::Upload(e.body_text())))?;
            audio = Some(VoicePayload::new(data));
            break;
        }
    }

    let payload = audio.ok_or_else(|| {
        ApiError::voice(Error::Upload(format!("missing '{}' field", AUDIO_FIELD)))
    })?;

    // Playback keeps running after the response; its outcome goes out as a
    // playbackStatus event.
    let ticket = state.voice.relay(payload).await.map_err(ApiError::voice)?;

    Ok(Json(VoiceResponse {
        message: "Audio data received and broadcasted successfully".to_string(),
        id: ticket.id,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        listeners: state.registry().len().await,
    })
}
