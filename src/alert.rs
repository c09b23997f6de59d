//! Alert evaluation for a single glucose reading.
//!
//! Holds the fixed clinical thresholds, the staleness check, the
//! value-to-level classifier, and the level-to-color table. Everything in
//! here is pure: callers pass the current time in explicitly and receive a
//! value back, nothing is logged or stored.

use std::fmt;

use anyhow::{bail, Result};
use serde::{Serialize, Serializer};

// ---

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Fixed clinical limits in mg/dl plus the staleness window.
///
/// Built once at startup (see [`AlertPolicy::default`]) and passed by
/// reference. The limits are not configurable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    // ---
    pub critical_high: i64,
    pub warn_high: i64,
    pub warn_low: i64,
    pub critical_low: i64,

    /// Readings older than this many minutes are not trusted for alerting.
    pub stale_window_minutes: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_high: 280,
            warn_high: 180,
            warn_low: 80,
            critical_low: 60,
            stale_window_minutes: 10,
        }
    }
}

impl Thresholds {
    /// Check the ordering invariant `critical_low < warn_low < warn_high < critical_high`.
    ///
    /// A violation is a configuration error and should stop startup.
    pub fn validate(&self) -> Result<()> {
        // ---
        if !(self.critical_low < self.warn_low
            && self.warn_low < self.warn_high
            && self.warn_high < self.critical_high)
        {
            bail!(
                "Invalid thresholds: expected {} < {} < {} < {}",
                self.critical_low,
                self.warn_low,
                self.warn_high,
                self.critical_high
            );
        }
        if self.stale_window_minutes < 0 {
            bail!(
                "Invalid stale window: {} minutes",
                self.stale_window_minutes
            );
        }
        Ok(())
    }

    /// True iff the reading taken at `timestamp_millis` is strictly older
    /// than the stale window at `now_millis`.
    ///
    /// A timestamp in the future yields a negative age and is never stale.
    pub fn is_stale(&self, timestamp_millis: i64, now_millis: i64) -> bool {
        // ---
        let elapsed = now_millis.saturating_sub(timestamp_millis);
        elapsed > self.stale_window_minutes.saturating_mul(MILLIS_PER_MINUTE)
    }

    /// Classify a value. Staleness wins over every value-based level.
    pub fn classify(&self, value: i64, stale: bool) -> AlertLevel {
        // ---
        if stale {
            return AlertLevel::Stale;
        }

        // Order matters if the limits are ever misconfigured.
        if value > self.critical_high {
            AlertLevel::CriticalHigh
        } else if value > self.warn_high {
            AlertLevel::WarnHigh
        } else if value < self.critical_low {
            AlertLevel::CriticalLow
        } else if value < self.warn_low {
            AlertLevel::WarnLow
        } else {
            AlertLevel::Normal
        }
    }
}

/// Alert bucket driving the display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlertLevel {
    CriticalHigh,
    WarnHigh,
    Normal,
    WarnLow,
    CriticalLow,
    Stale,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 6] = [
        AlertLevel::CriticalHigh,
        AlertLevel::WarnHigh,
        AlertLevel::Normal,
        AlertLevel::WarnLow,
        AlertLevel::CriticalLow,
        AlertLevel::Stale,
    ];
}

/// A 24-bit RGB color, rendered as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xFF0000);
    pub const ORANGE: Color = Color(0xFFA500);
    pub const YELLOW: Color = Color(0xFFFF00);
    pub const GREEN: Color = Color(0x00FF00);
    pub const PURPLE: Color = Color(0x800080);

    pub fn rgb(self) -> u32 {
        self.0 & 0xFF_FFFF
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.rgb())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Background color for each alert level.
///
/// Both critical levels share red; that is intentional and must stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMapping {
    // ---
    pub critical_high: Color,
    pub warn_high: Color,
    pub normal: Color,
    pub warn_low: Color,
    pub critical_low: Color,
    pub stale: Color,
}

impl Default for ColorMapping {
    fn default() -> Self {
        Self {
            critical_high: Color::RED,
            warn_high: Color::YELLOW,
            normal: Color::GREEN,
            warn_low: Color::ORANGE,
            critical_low: Color::RED,
            stale: Color::PURPLE,
        }
    }
}

impl ColorMapping {
    pub fn color_of(&self, level: AlertLevel) -> Color {
        // ---
        match level {
            AlertLevel::CriticalHigh => self.critical_high,
            AlertLevel::WarnHigh => self.warn_high,
            AlertLevel::Normal => self.normal,
            AlertLevel::WarnLow => self.warn_low,
            AlertLevel::CriticalLow => self.critical_low,
            AlertLevel::Stale => self.stale,
        }
    }
}

/// Thresholds and colors bundled together, constructed once per process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertPolicy {
    pub thresholds: Thresholds,
    pub colors: ColorMapping,
}

impl AlertPolicy {
    /// Build the fixed policy and check its invariants.
    pub fn new() -> Result<Self> {
        // ---
        let policy = Self::default();
        policy.thresholds.validate()?;
        Ok(policy)
    }

    /// Staleness, level, and color for one reading in a single call.
    pub fn evaluate(&self, value: i64, timestamp_millis: i64, now_millis: i64) -> (AlertLevel, Color) {
        // ---
        let stale = self.thresholds.is_stale(timestamp_millis, now_millis);
        let level = self.thresholds.classify(value, stale);
        (level, self.colors.color_of(level))
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    const NOW: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn test_default_thresholds_are_valid() {
        // ---
        assert!(thresholds().validate().is_ok());
        assert!(AlertPolicy::new().is_ok());
    }

    #[test]
    fn test_misordered_thresholds_rejected() {
        // ---
        let bad = Thresholds {
            warn_low: 200,
            ..Thresholds::default()
        };
        assert!(bad.validate().is_err());

        let equal = Thresholds {
            warn_high: 280,
            ..Thresholds::default()
        };
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_stale_boundary() {
        // ---
        let t = thresholds();

        // Exactly ten minutes is still fresh
        assert!(!t.is_stale(NOW - 10 * MINUTE, NOW));

        // Ten minutes and one second is stale
        assert!(t.is_stale(NOW - 10 * MINUTE - 1_000, NOW));

        assert!(!t.is_stale(NOW, NOW));
        assert!(t.is_stale(NOW - 60 * MINUTE, NOW));
    }

    #[test]
    fn test_future_timestamp_is_not_stale() {
        // ---
        let t = thresholds();
        assert!(!t.is_stale(NOW + 5 * MINUTE, NOW));
        assert!(!t.is_stale(NOW + 500 * MINUTE, NOW));
    }

    #[test]
    fn test_stale_is_monotonic_in_now() {
        // ---
        let t = thresholds();
        let ts = NOW - 11 * MINUTE;
        assert!(t.is_stale(ts, NOW));
        for step in [1, 1_000, MINUTE, 24 * 60 * MINUTE] {
            assert!(t.is_stale(ts, NOW + step));
        }
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        // ---
        let t = thresholds();
        assert!(t.is_stale(i64::MIN, i64::MAX));
        assert!(!t.is_stale(i64::MAX, i64::MIN));
    }

    #[test]
    fn test_classify_scenarios() {
        // ---
        let t = thresholds();
        assert_eq!(t.classify(300, false), AlertLevel::CriticalHigh);
        assert_eq!(t.classify(190, false), AlertLevel::WarnHigh);
        assert_eq!(t.classify(120, false), AlertLevel::Normal);
        assert_eq!(t.classify(70, false), AlertLevel::WarnLow);
        assert_eq!(t.classify(50, false), AlertLevel::CriticalLow);
        assert_eq!(t.classify(120, true), AlertLevel::Stale);
    }

    #[test]
    fn test_classify_boundaries() {
        // ---
        let t = thresholds();
        assert_eq!(t.classify(281, false), AlertLevel::CriticalHigh);
        assert_eq!(t.classify(280, false), AlertLevel::WarnHigh);
        assert_eq!(t.classify(181, false), AlertLevel::WarnHigh);
        assert_eq!(t.classify(180, false), AlertLevel::Normal);
        assert_eq!(t.classify(80, false), AlertLevel::Normal);
        assert_eq!(t.classify(79, false), AlertLevel::WarnLow);
        assert_eq!(t.classify(60, false), AlertLevel::WarnLow);
        assert_eq!(t.classify(59, false), AlertLevel::CriticalLow);
    }

    #[test]
    fn test_low_values_are_critical() {
        // ---
        let t = thresholds();
        for v in [-1_000, -1, 0, 1, 30, 59] {
            assert_eq!(t.classify(v, false), AlertLevel::CriticalLow, "value {v}");
        }
    }

    #[test]
    fn test_normal_range() {
        // ---
        let t = thresholds();
        for v in 80..=180 {
            assert_eq!(t.classify(v, false), AlertLevel::Normal, "value {v}");
        }
    }

    #[test]
    fn test_stale_overrides_every_value() {
        // ---
        let t = thresholds();
        for v in [-5, 0, 40, 59, 70, 120, 190, 281, 600] {
            assert_eq!(t.classify(v, true), AlertLevel::Stale, "value {v}");
        }
    }

    #[test]
    fn test_misconfigured_order_uses_first_match() {
        // ---
        // Overlapping limits: 100 is both above warn_high and below warn_low.
        let t = Thresholds {
            critical_high: 280,
            warn_high: 90,
            warn_low: 150,
            critical_low: 60,
            stale_window_minutes: 10,
        };
        assert_eq!(t.classify(100, false), AlertLevel::WarnHigh);
    }

    #[test]
    fn test_color_mapping() {
        // ---
        let colors = ColorMapping::default();
        assert_eq!(colors.color_of(AlertLevel::CriticalHigh), Color::RED);
        assert_eq!(colors.color_of(AlertLevel::WarnHigh), Color::YELLOW);
        assert_eq!(colors.color_of(AlertLevel::Normal), Color::GREEN);
        assert_eq!(colors.color_of(AlertLevel::WarnLow), Color::ORANGE);
        assert_eq!(colors.color_of(AlertLevel::CriticalLow), Color::RED);
        assert_eq!(colors.color_of(AlertLevel::Stale), Color::PURPLE);

        let palette = [Color::RED, Color::ORANGE, Color::YELLOW, Color::GREEN, Color::PURPLE];
        for level in AlertLevel::ALL {
            assert!(palette.contains(&colors.color_of(level)));
        }
    }

    #[test]
    fn test_color_display() {
        // ---
        assert_eq!(Color::RED.to_string(), "#FF0000");
        assert_eq!(Color::GREEN.to_string(), "#00FF00");
        assert_eq!(Color::PURPLE.to_string(), "#800080");
        assert_eq!(serde_json::to_string(&Color::ORANGE).unwrap(), "\"#FFA500\"");
    }

    #[test]
    fn test_evaluate() {
        // ---
        let policy = AlertPolicy::default();
        assert_eq!(
            policy.evaluate(300, NOW - MINUTE, NOW),
            (AlertLevel::CriticalHigh, Color::RED)
        );
        assert_eq!(
            policy.evaluate(50, NOW - 3 * MINUTE, NOW),
            (AlertLevel::CriticalLow, Color::RED)
        );
        assert_eq!(
            policy.evaluate(120, NOW - 30 * MINUTE, NOW),
            (AlertLevel::Stale, Color::PURPLE)
        );
    }
}
