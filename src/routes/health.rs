//! Liveness endpoint for the monitor.
//!
//! `GET /health` answers as long as the HTTP server is up. It does not look
//! at the display slot or the data source, so a monitor that cannot reach
//! its data source still reports healthy; `/display` shows the reading age.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Subrouter with the single GET `/health` route, generic over the gateway
/// state so it merges with any router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
