//! Chat handler: validates the turn, runs the pipeline, maps the outcome to HTTP.
//!
//! 400 for a missing/empty message (no external calls), 500 with the persona apology
//! and the `error` mood image when generation fails, 200 with the reply otherwise.

use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tugi_core::{ChatError, ConversationTurn, ErrorPayload};

/// Inbound chat turn from the browser front end.
#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Prior turns, oldest first. `null` or absent means no history.
    #[serde(default)]
    pub history: Option<Vec<ConversationTurn>>,
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let correlation_id = uuid::Uuid::new_v4();
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::info!(
                target: "tugi::chat",
                %correlation_id,
                error = %rejection,
                "Rejected malformed chat request"
            );
            return client_error();
        }
    };

    let message = req.message.unwrap_or_default();
    let history = req.history.unwrap_or_default();
    tracing::info!(
        target: "tugi::chat",
        %correlation_id,
        chars = message.chars().count(),
        history = history.len(),
        "Chat request received"
    );

    match state.pipeline.handle_turn(&message, history).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(ChatError::EmptyMessage) => client_error(),
        Err(ChatError::Generation(e)) => {
            tracing::error!(target: "tugi::chat", %correlation_id, error = %e, "Chat generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorPayload::generation_failure()),
            )
                .into_response()
        }
    }
}

fn client_error() -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorPayload::missing_message())).into_response()
}
