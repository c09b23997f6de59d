//! `GET /display`: the state currently shown on the monitor.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde_json::json;
use tracing::debug;

use crate::display::SharedDisplay;

// ---

pub fn router() -> Router<SharedDisplay> {
    // ---
    Router::new().route("/display", get(handler))
}

async fn handler(State(display): State<SharedDisplay>) -> impl IntoResponse {
    // ---
    match display.current().await {
        Some(state) => {
            debug!("GET /display - Returning OK");
            (StatusCode::OK, Json(state)).into_response()
        }
        None => {
            debug!("GET /display - No reading yet");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "waiting for first reading" })),
            )
                .into_response()
        }
    }
}
