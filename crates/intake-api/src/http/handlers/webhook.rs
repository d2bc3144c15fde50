//! WhatsApp webhook endpoints.
//!
//! `GET /webhook` answers the subscription handshake. `POST /webhook`
//! receives message deliveries and feeds the first text message to the
//! intake service. Deliveries are always acknowledged with 200 once they
//! pass signature verification, otherwise WhatsApp keeps retrying them.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;

use intake_infra::whatsapp::webhook::{verify_signature, verify_subscription, WebhookPayload};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook - Subscription handshake.
///
/// Echoes `hub.challenge` when the mode is `subscribe` and the token matches.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> Response {
    match verify_subscription(
        query.mode.as_deref(),
        query.verify_token.as_deref(),
        state.config.whatsapp.verify_token.expose_secret(),
    ) {
        Ok(()) => {
            tracing::info!("webhook subscription verified");
            (StatusCode::OK, query.challenge.unwrap_or_default()).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "webhook subscription refused");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// POST /webhook - Receive a message delivery.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let app_secret = state
        .config
        .whatsapp
        .app_secret
        .as_ref()
        .map(|s| s.expose_secret())
        .filter(|s| !s.is_empty());
    if let Some(secret) = app_secret {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok());
        verify_signature(secret.as_bytes(), &body, signature)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unparsable webhook body");
            return Ok(StatusCode::OK);
        }
    };

    let Some(message) = payload.first_message() else {
        return Ok(StatusCode::OK);
    };

    let user_id = message.user_id.clone();
    match state.service.handle_inbound(message).await {
        Ok(outcome) => tracing::debug!(%user_id, ?outcome, "inbound message handled"),
        Err(e) => tracing::error!(%user_id, error = %e, "inbound message failed"),
    }

    Ok(StatusCode::OK)
}
