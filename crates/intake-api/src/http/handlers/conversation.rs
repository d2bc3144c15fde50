//! Operator JSON API: transcripts and manual sends.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use intake_types::transcript::TranscriptEntry;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body of a manual send, shared by the JSON API and the monitor form.
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SendRequest {
    /// Both fields present and non-blank, trimmed recipient.
    pub fn validate(&self) -> Result<(String, String), AppError> {
        let to = self
            .to
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("'to' is required".to_string()))?;
        let message = self
            .message
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Validation("'message' is required".to_string()))?;
        Ok((to.to_string(), message.to_string()))
    }
}

/// GET /api/chats - Every transcript, keyed by user id.
pub async fn list_chats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, Vec<TranscriptEntry>>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chats = state.service.list_conversations().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chats, request_id, elapsed)))
}

/// GET /api/chat/{user_id} - One transcript. Unknown users get an empty list.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TranscriptEntry>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entries = state.service.get_conversation(&user_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(entries, request_id, elapsed)))
}

/// POST /api/send - Send an operator message outside the automated flow.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let (to, message) = request.validate()?;
    state.service.send_manual(&to, &message).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "status": "ok" }),
        request_id,
        elapsed,
    )))
}
