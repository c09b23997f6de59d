//! HTTP gateway for the monitor.
//!
//! Each sibling module exports a subrouter; this gateway merges them and
//! attaches the shared display slot as state, so `main.rs` only sees
//! [`router`].

use axum::Router;

use crate::display::SharedDisplay;

mod display;
mod health;

// ---

pub fn router(display: SharedDisplay) -> Router {
    // ---
    Router::new()
        .merge(display::router())
        .merge(health::router())
        .with_state(display)
}
