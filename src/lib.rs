//! # glucose-monitor
//!
//! Polls a Nightscout-style data source for the latest glucose reading and
//! turns it into an alert color plus three lines of display text.
//!
//! - [`alert`]: thresholds, staleness, alert levels and their colors
//! - [`format`]: value, trend glyph, and age text
//! - [`models`]: the [`Reading`] and its trend [`Direction`]
//! - [`clock`], [`source`], [`poller`]: the polling shell around the core
//! - [`display`], [`routes`]: the last rendered state and its HTTP surface

pub mod alert;
pub mod clock;
pub mod config;
pub mod display;
pub mod format;
pub mod models;
pub mod poller;
pub mod routes;
pub mod source;

pub use alert::{AlertLevel, AlertPolicy, Color, ColorMapping, Thresholds};
pub use config::Config;
pub use display::{DisplayState, SharedDisplay};
pub use models::{Direction, Reading};
