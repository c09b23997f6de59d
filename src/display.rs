//! Display state for the monitor.
//!
//! [`render`] turns a [`Reading`] into what the screen shows: a background
//! color and three lines of text. [`SharedDisplay`] holds the most recent
//! render so the HTTP layer can serve it. A failed poll never publishes, so
//! the previous state stays up until the next good reading.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::alert::{AlertLevel, AlertPolicy, Color};
use crate::format::{format_age, format_direction, format_value};
use crate::models::Reading;

// ---

/// Everything the display shows for one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    // ---
    /// Caption: the name of the person being monitored.
    pub name: String,
    pub level: AlertLevel,
    /// Background color.
    pub color: Color,
    pub value_text: String,
    pub direction_text: String,
    pub age_text: String,
    pub reading_timestamp: Option<DateTime<Utc>>,
    /// When this state was rendered.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Render a reading against the policy at `now_millis`.
pub fn render(reading: &Reading, now_millis: i64, name: &str, policy: &AlertPolicy) -> DisplayState {
    // ---
    let (level, color) = policy.evaluate(reading.value, reading.timestamp_millis, now_millis);

    DisplayState {
        name: name.to_string(),
        level,
        color,
        value_text: format_value(reading.value),
        direction_text: format_direction(&reading.direction),
        age_text: format_age(reading.timestamp_millis, now_millis),
        reading_timestamp: DateTime::from_timestamp_millis(reading.timestamp_millis),
        updated_at: DateTime::from_timestamp_millis(now_millis),
    }
}

/// Slot holding the last rendered state, shared between the poller and
/// the HTTP routes.
#[derive(Debug, Clone, Default)]
pub struct SharedDisplay {
    inner: Arc<RwLock<Option<DisplayState>>>,
}

impl SharedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown state and log it.
    pub async fn publish(&self, state: DisplayState) {
        // ---
        tracing::info!(
            level = ?state.level,
            color = %state.color,
            "Display: {} | {} | {} | {}",
            state.name,
            state.value_text,
            state.direction_text,
            state.age_text
        );
        *self.inner.write().await = Some(state);
    }

    /// Current state, or `None` before the first successful reading.
    pub async fn current(&self) -> Option<DisplayState> {
        self.inner.read().await.clone()
    }
}
