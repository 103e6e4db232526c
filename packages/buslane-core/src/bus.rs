//! Bus catalog documents: static schedule, seat map, and publish flag.

use serde::{Deserialize, Serialize};

use crate::types::{BusId, Fare, SeatNo};

/// A named stop descriptor within a bus's stoppage set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stoppage {
    pub name: String,
}

/// A named station in the auxiliary station directory.
///
/// Stations are deduplicated by `name` before insertion; there is no
/// further structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
}

/// A bus document: the static schedule plus live seat state.
///
/// Seat state is bus-level, not date-scoped. The persisted `booked` list is
/// a cache; the per-date truth is computed at read time by the availability
/// overlay ([`crate::availability`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: BusId,
    pub operator: String,
    pub name: String,
    /// Ordered stoppage names along the route.
    pub route: Vec<String>,
    /// Stop descriptors served by this bus; order is not significant here.
    pub stoppages: Vec<Stoppage>,
    /// Per-seat fare.
    pub cost: Fare,
    pub departure_time: String,
    /// Seat identifiers currently free.
    pub available_seats: Vec<SeatNo>,
    /// Seat identifiers held by confirmed bookings. Ascending, no duplicates.
    pub booked: Vec<SeatNo>,
    /// Operator-controlled publish flag.
    pub available: bool,
}

impl Bus {
    /// Whether the stoppage set contains both named stops.
    ///
    /// Membership only — relative order along the route is not checked, so
    /// a reversed `from`/`to` pair still matches.
    #[must_use]
    pub fn serves(&self, from: &str, to: &str) -> bool {
        let has = |name: &str| self.stoppages.iter().any(|s| s.name == name);
        has(from) && has(to)
    }

    /// Whether the free and booked seat lists share no seat.
    #[must_use]
    pub fn seats_disjoint(&self) -> bool {
        self.available_seats.iter().all(|s| !self.booked.contains(s))
    }

    /// Whether `booked` is strictly ascending (which also rules out
    /// duplicates).
    #[must_use]
    pub fn booked_strictly_ascending(&self) -> bool {
        self.booked.windows(2).all(|w| w[0] < w[1])
    }
}
