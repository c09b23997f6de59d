//! Display text for a reading: value, trend glyph, and age.

use crate::models::Direction;

// ---

/// `"<value> mg/dl"`.
pub fn format_value(value: i64) -> String {
    format!("{} mg/dl", value)
}

/// Arrow glyph for a trend tag; unknown tags come back as their raw text.
///
/// `DoubleDown` renders as `↑↑`, the same glyph as `DoubleUp`.
pub fn format_direction(direction: &Direction) -> String {
    // ---
    let glyph = match direction {
        Direction::None => "↔",
        Direction::Flat => "→",
        Direction::SingleUp => "↑",
        Direction::DoubleUp => "↑↑",
        Direction::DoubleDown => "↑↑",
        Direction::SingleDown => "↓",
        Direction::FortyFiveDown => "→↓",
        Direction::FortyFiveUp => "→↑",
        Direction::Unknown(raw) => return raw.clone(),
    };
    glyph.to_string()
}

/// Minutes between the reading and `now_millis`, unrounded. Negative when
/// the reading is timestamped in the future.
pub fn elapsed_minutes(timestamp_millis: i64, now_millis: i64) -> f64 {
    // ---
    now_millis.saturating_sub(timestamp_millis) as f64 / 60_000.0
}

/// `"<elapsed minutes> minutes ago"`. The elapsed value is unrounded and
/// always carries a fractional part (`2.5`, `10.0`, `-1.5`).
pub fn format_age(timestamp_millis: i64, now_millis: i64) -> String {
    // ---
    let minutes = elapsed_minutes(timestamp_millis, now_millis);
    if minutes.fract() == 0.0 {
        format!("{:.1} minutes ago", minutes)
    } else {
        format!("{} minutes ago", minutes)
    }
}
