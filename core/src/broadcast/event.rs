//! Events pushed from the server to connected listeners

use crate::types::{Message, Reply, VoiceId, VoicePayload};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Server to client event.
///
/// Serialized as `{ "event": "<name>", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A freshly persisted message
    UserMessage(Message),

    /// The canned reply to a message
    ResponseMessage(Reply),

    /// Raw voice bytes, relayed as uploaded. Clones share the buffer.
    VoiceMessage {
        id: VoiceId,
        #[serde(rename = "audioBuffer")]
        audio_buffer: Bytes,
    },

    /// Outcome of server-side playback for a relayed voice message
    PlaybackStatus {
        id: VoiceId,
        ok: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ServerEvent {
    pub fn voice(id: VoiceId, payload: VoicePayload) -> Self {
        Self::VoiceMessage {
            id,
            audio_buffer: payload.into_bytes(),
        }
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserMessage(_) => "userMessage",
            Self::ResponseMessage(_) => "responseMessage",
            Self::VoiceMessage { .. } => "voiceMessage",
            Self::PlaybackStatus { .. } => "playbackStatus",
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::Error::Serialization(format!("Failed to encode event: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_message_shape() {
        let event = ServerEvent::ResponseMessage(Reply::for_text("hi"));
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({ "event": "responseMessage", "data": { "text": "I am Reply Message with hi" } })
        );
    }

    #[test]
    fn test_voice_message_carries_exact_bytes() {
        let id = VoiceId::new();
        let event = ServerEvent::voice(id, VoicePayload::from(vec![0u8, 7, 255]));
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(value["event"], "voiceMessage");
        assert_eq!(value["data"]["audioBuffer"], json!([0, 7, 255]));
        assert_eq!(value["data"]["id"], id.to_string());

        let decoded: ServerEvent = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_voice_clones_share_one_buffer() {
        let payload = VoicePayload::from(vec![1u8; 1024]);
        let source = payload.as_bytes().as_ptr();
        let event = ServerEvent::voice(VoiceId::new(), payload);

        for _ in 0..3 {
            match event.clone() {
                ServerEvent::VoiceMessage { audio_buffer, .. } => {
                    assert_eq!(audio_buffer.as_ptr(), source);
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[test]
    fn test_playback_status_omits_missing_error() {
        let event = ServerEvent::PlaybackStatus { id: VoiceId::new(), ok: true, error: None };
        let value: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        assert_eq!(value["event"], event.name());
        assert_eq!(value["data"]["ok"], true);
        assert!(value["data"].get("error").is_none());
    }
}
