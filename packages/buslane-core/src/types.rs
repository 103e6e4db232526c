//! Scalar domain types shared across the buslane crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque unique identifier for a bus document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(String);

impl BusId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier for a newly registered bus.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric seat identifier within a bus's seat map.
///
/// `Ord` so that booked-seat lists sort ascending numerically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SeatNo(pub u32);

impl std::fmt::Display for SeatNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar date of travel, serialized as `YYYY-MM-DD` on the wire.
///
/// Distinct from a booking's creation time: a booking made today can be for
/// travel next month.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TravelDate(pub NaiveDate);

impl TravelDate {
    /// Parses a `YYYY-MM-DD` date string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self)
    }
}

impl std::fmt::Display for TravelDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Per-seat fare in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fare(pub f64);

impl Fare {
    /// The fare expressed in integral minor currency units, rounded down.
    ///
    /// Payment collaborators denominate intents in minor units, so a fare of
    /// `12.5` becomes `1250`.
    #[must_use]
    // Fares are small positive amounts; the truncating cast is the rounding.
    #[allow(clippy::cast_possible_truncation)]
    pub fn minor_units(self) -> i64 {
        (self.0 * 100.0).floor() as i64
    }
}
