use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::state::AppState;
use crate::domain::{ChatError, ChatMessage};

/// Pre-stream pipeline failure rendered as a structured error body naming
/// the failing stage. Mid-stream failures never reach this path; the status
/// line is already committed by then.
pub struct ApiError(pub ChatError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ChatError::InvalidHistory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChatError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };

        (
            status,
            Json(json!({
                "stage": self.0.stage(),
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        Self(e)
    }
}

/// `POST /api/v1/chat` - body is the chronological conversation; the
/// response body is the model's token stream relayed as raw text.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(history): Json<Vec<ChatMessage>>,
) -> Result<Response, ApiError> {
    let stream = state.chat_service.respond(&history).await.map_err(|e| {
        tracing::error!(error = %e, stage = e.stage(), "Chat pipeline failed before streaming");
        ApiError(e)
    })?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}
