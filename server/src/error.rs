//! Mapping of core errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use echochat_core::Error;
use serde_json::json;
use tracing::error;

/// Which response body shape the failing route uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `{ "message": ... }`
    Message,
    /// `{ "error": ... }`
    Voice,
}

/// Error returned by a handler
#[derive(Debug)]
pub struct ApiError {
    route: Route,
    status: StatusCode,
    text: String,
}

impl ApiError {
    pub fn message(err: Error) -> Self {
        Self::from_core(Route::Message, err)
    }

    pub fn voice(err: Error) -> Self {
        Self::from_core(Route::Voice, err)
    }

    pub fn not_found() -> Self {
        Self {
            route: Route::Message,
            status: StatusCode::NOT_FOUND,
            text: "Message not found".to_string(),
        }
    }

    fn from_core(route: Route, err: Error) -> Self {
        error!("Request failed: {}", err);

        let text = match &err {
            Error::Validation(reason) | Error::Upload(reason) => reason.clone(),
            _ => "Internal Server Error".to_string(),
        };

        Self {
            route,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            text,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.route {
            Route::Message => json!({ "message": self.text }),
            Route::Voice => json!({ "error": self.text }),
        };
        (self.status, Json(body)).into_response()
    }
}
