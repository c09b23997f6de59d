//! Data models for a glucose reading.

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

// ---

/// Trend direction reported alongside a reading.
///
/// Tags outside the known set are kept verbatim in [`Direction::Unknown`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    None,
    Flat,
    SingleUp,
    DoubleUp,
    SingleDown,
    DoubleDown,
    FortyFiveUp,
    FortyFiveDown,
    Unknown(String),
}

impl Direction {
    /// Wire tag as sent by the data source.
    pub fn as_str(&self) -> &str {
        // ---
        match self {
            Direction::None => "NONE",
            Direction::Flat => "Flat",
            Direction::SingleUp => "SingleUp",
            Direction::DoubleUp => "DoubleUp",
            Direction::SingleDown => "SingleDown",
            Direction::DoubleDown => "DoubleDown",
            Direction::FortyFiveUp => "FortyFiveUp",
            Direction::FortyFiveDown => "FortyFiveDown",
            Direction::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for Direction {
    fn from(tag: &str) -> Self {
        match tag {
            "NONE" => Direction::None,
            "Flat" => Direction::Flat,
            "SingleUp" => Direction::SingleUp,
            "DoubleUp" => Direction::DoubleUp,
            "SingleDown" => Direction::SingleDown,
            "DoubleDown" => Direction::DoubleDown,
            "FortyFiveUp" => Direction::FortyFiveUp,
            "FortyFiveDown" => Direction::FortyFiveDown,
            other => Direction::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Direction {
    fn from(tag: String) -> Self {
        Direction::from(tag.as_str())
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complete reading: value in mg/dl, trend, and epoch milliseconds (UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    // ---
    pub value: i64,
    pub direction: Direction,
    pub timestamp_millis: i64,
}

/// Entry as it appears in a Nightscout `entries.json` array.
///
/// Every field is optional on the wire (calibration and meter entries omit
/// `sgv`), so conversion to [`Reading`] checks each one.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    // ---
    pub sgv: Option<i64>,
    pub direction: Option<String>,

    /// Epoch milliseconds, UTC.
    pub date: Option<i64>,
}

impl RawEntry {
    pub fn to_reading(&self) -> Result<Reading> {
        // ---
        let value = self.sgv.ok_or_else(|| anyhow!("entry is missing 'sgv'"))?;
        let direction = self
            .direction
            .as_deref()
            .ok_or_else(|| anyhow!("entry is missing 'direction'"))?;
        let timestamp_millis = self.date.ok_or_else(|| anyhow!("entry is missing 'date'"))?;

        Ok(Reading {
            value,
            direction: Direction::from(direction),
            timestamp_millis,
        })
    }
}
