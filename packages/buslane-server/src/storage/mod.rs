//! Store interfaces and engines for the platform's collections.
//!
//! Two primary collections (buses, bookings) and two auxiliary ones
//! (stations, users), each behind an async trait so backends are pluggable.
//! [`Stores`] bundles the four handles with an explicit `open`/`close`
//! lifecycle and is injected into every component — store access is never
//! ambient global state.

pub mod bookings;
pub mod catalog;
pub mod directory;
pub mod memory;

pub use bookings::{BookingStore, InsertError};
pub use catalog::BusCatalog;
pub use directory::{StationDirectory, UserDirectory};
pub use memory::{
    MemoryBookingStore, MemoryBusCatalog, MemoryStationDirectory, MemoryUserDirectory,
};

use std::sync::Arc;

/// The shared store handles, cloned cheaply into each component.
#[derive(Clone)]
pub struct Stores {
    pub buses: Arc<dyn BusCatalog>,
    pub bookings: Arc<dyn BookingStore>,
    pub stations: Arc<dyn StationDirectory>,
    pub users: Arc<dyn UserDirectory>,
}

impl Stores {
    /// In-memory engines for all four collections.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            buses: Arc::new(MemoryBusCatalog::new()),
            bookings: Arc::new(MemoryBookingStore::new()),
            stations: Arc::new(MemoryStationDirectory::new()),
            users: Arc::new(MemoryUserDirectory::new()),
        }
    }

    /// Opens every store. Called once at startup before serving.
    ///
    /// # Errors
    ///
    /// Returns the first backend initialization failure.
    pub async fn open(&self) -> anyhow::Result<()> {
        self.buses.open().await?;
        self.bookings.open().await?;
        self.stations.open().await?;
        self.users.open().await?;
        Ok(())
    }

    /// Closes every store, releasing backend resources.
    ///
    /// # Errors
    ///
    /// Returns the first backend teardown failure.
    pub async fn close(&self) -> anyhow::Result<()> {
        self.buses.close().await?;
        self.bookings.close().await?;
        self.stations.close().await?;
        self.users.close().await?;
        Ok(())
    }
}
