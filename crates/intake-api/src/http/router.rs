//! Axum router configuration with middleware.
//!
//! - `/webhook`: WhatsApp handshake and deliveries.
//! - `/api/*`: operator JSON API (envelope responses).
//! - `/monitor`: operator HTML page.
//!
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chats", get(handlers::conversation::list_chats))
        .route("/chat/{user_id}", get(handlers::conversation::get_chat))
        .route("/send", post(handlers::conversation::send_message));

    Router::new()
        .route(
            "/webhook",
            get(handlers::webhook::verify_webhook).post(handlers::webhook::receive_webhook),
        )
        .nest("/api", api_routes)
        .route("/monitor", get(handlers::monitor::monitor_page))
        .route("/monitor/send", post(handlers::monitor::monitor_send))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
