//! In-memory store engines backed by [`DashMap`].
//!
//! Reads clone point-in-time snapshots and never block writers. The one
//! hard consistency requirement — no two bookings claiming the same seat
//! for the same bus and travel date — is enforced inside
//! [`MemoryBookingStore::insert_if_absent`]: the duplicate check, the
//! seat-overlap check, and the insert all happen under a single write
//! mutex, so the second of two racing writers is rejected.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use buslane_core::{
    candidate_buses, Booking, Bus, BusId, SeatNo, Station, TravelDate, User,
};

use super::bookings::{BookingStore, InsertError};
use super::catalog::BusCatalog;
use super::directory::{StationDirectory, UserDirectory};

// ---------------------------------------------------------------------------
// Bus catalog
// ---------------------------------------------------------------------------

/// In-memory bus catalog.
pub struct MemoryBusCatalog {
    entries: DashMap<BusId, Bus>,
}

impl MemoryBusCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Point-in-time snapshot of all buses. Mutation-tolerant.
    fn snapshot(&self) -> Vec<Bus> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }
}

impl Default for MemoryBusCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BusCatalog for MemoryBusCatalog {
    async fn open(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert(&self, bus: Bus) -> anyhow::Result<()> {
        self.entries.insert(bus.id.clone(), bus);
        Ok(())
    }

    async fn get(&self, id: &BusId) -> anyhow::Result<Option<Bus>> {
        Ok(self.entries.get(id).map(|b| b.clone()))
    }

    async fn find_serving(&self, from: &str, to: &str) -> anyhow::Result<Vec<Bus>> {
        Ok(candidate_buses(self.snapshot(), from, to))
    }

    async fn find_by_operator(&self, operator: &str) -> anyhow::Result<Vec<Bus>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.operator == operator)
            .collect())
    }

    async fn find_by_operator_and_availability(
        &self,
        operator: &str,
        available: bool,
    ) -> anyhow::Result<Vec<Bus>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.operator == operator && b.available == available)
            .collect())
    }

    async fn set_available(&self, id: &BusId, available: bool) -> anyhow::Result<bool> {
        match self.entries.get_mut(id) {
            Some(mut bus) => {
                bus.available = available;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &BusId) -> anyhow::Result<bool> {
        Ok(self.entries.remove(id).is_some())
    }

    async fn all(&self) -> anyhow::Result<Vec<Bus>> {
        Ok(self.snapshot())
    }
}

// ---------------------------------------------------------------------------
// Booking store
// ---------------------------------------------------------------------------

/// Seats already claimed per `(bus, travel date)` pair.
type SeatIndex = DashMap<(BusId, TravelDate), BTreeSet<SeatNo>>;

/// In-memory booking store with conditional, conflict-checked inserts.
pub struct MemoryBookingStore {
    entries: DashMap<String, Booking>,
    seats_by_trip: SeatIndex,
    /// Serializes the check-then-insert sequence. Reads never take it.
    write_lock: Mutex<()>,
}

impl MemoryBookingStore {
    /// Creates an empty booking store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            seats_by_trip: DashMap::new(),
            write_lock: Mutex::new(()),
        }
    }

    fn snapshot(&self) -> Vec<Booking> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }
}

impl Default for MemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn open(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_if_absent(&self, booking: Booking) -> Result<(), InsertError> {
        let _guard = self.write_lock.lock();

        if self.entries.contains_key(&booking.transaction_id) {
            return Err(InsertError::DuplicateTransaction(
                booking.transaction_id.clone(),
            ));
        }

        let trip = (
            booking.bus_snapshot.bus_id.clone(),
            booking.bus_snapshot.date,
        );
        let requested = booking.seat_numbers();
        if let Some(taken) = self.seats_by_trip.get(&trip) {
            let clash: Vec<SeatNo> = requested
                .iter()
                .copied()
                .filter(|seat| taken.contains(seat))
                .collect();
            if !clash.is_empty() {
                return Err(InsertError::SeatsTaken(clash));
            }
        }

        self.seats_by_trip.entry(trip).or_default().extend(requested);
        self.entries
            .insert(booking.transaction_id.clone(), booking);
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> anyhow::Result<Option<Booking>> {
        Ok(self.entries.get(transaction_id).map(|b| b.clone()))
    }

    async fn find_by_travel_date(
        &self,
        date: TravelDate,
    ) -> anyhow::Result<Vec<Booking>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.bus_snapshot.date == date)
            .collect())
    }

    async fn find_by_operator(&self, operator: &str) -> anyhow::Result<Vec<Booking>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.bus_snapshot.operator == operator)
            .collect())
    }

    async fn find_by_contact_email(&self, email: &str) -> anyhow::Result<Vec<Booking>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|b| b.contact.email == email)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Station and user directories
// ---------------------------------------------------------------------------

/// In-memory station directory keyed by name.
pub struct MemoryStationDirectory {
    entries: DashMap<String, Station>,
}

impl MemoryStationDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for MemoryStationDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StationDirectory for MemoryStationDirectory {
    async fn open(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_unique(&self, station: Station) -> anyhow::Result<bool> {
        match self.entries.entry(station.name.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(station);
                Ok(true)
            }
        }
    }

    async fn all(&self) -> anyhow::Result<Vec<Station>> {
        Ok(self.entries.iter().map(|e| e.value().clone()).collect())
    }
}

/// In-memory user directory keyed by email.
pub struct MemoryUserDirectory {
    entries: DashMap<String, User>,
}

impl MemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Default for MemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn open(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn upsert(&self, user: User) -> anyhow::Result<()> {
        self.entries.insert(user.email.clone(), user);
        Ok(())
    }

    async fn get(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.entries.get(email).map(|u| u.clone()))
    }
}
