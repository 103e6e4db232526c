//! Booking store interface and its typed insert errors.

use async_trait::async_trait;

use buslane_core::{Booking, SeatNo, TravelDate};

/// Why a conditional booking insert was rejected.
///
/// The two conflict variants carry enough detail for the client to decide
/// between retrying payment and reselecting seats.
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    /// A booking with this transaction id already exists.
    #[error("transaction {0} already exists")]
    DuplicateTransaction(String),
    /// Some requested seats are already claimed for the same bus and date.
    #[error("requested seats are already claimed for this bus and date")]
    SeatsTaken(Vec<SeatNo>),
    /// The backend itself failed.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// The booking collection: one immutable document per paid transaction.
///
/// [`insert_if_absent`](BookingStore::insert_if_absent) is the only durable
/// write in the booking pipeline, and it is all-or-nothing: the conditional
/// checks and the insert happen atomically, so of two racing writers for
/// the same seats exactly one succeeds.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// One-time initialization.
    async fn open(&self) -> anyhow::Result<()>;

    /// Release resources and close connections.
    async fn close(&self) -> anyhow::Result<()>;

    /// Atomically insert a booking, rejecting duplicates and seat overlaps.
    ///
    /// # Errors
    ///
    /// [`InsertError::DuplicateTransaction`] when the transaction id is
    /// already present; [`InsertError::SeatsTaken`] when any requested seat
    /// for `(bus, travel date)` is claimed by an existing booking.
    async fn insert_if_absent(&self, booking: Booking) -> Result<(), InsertError>;

    /// Fetch a booking by its transaction id.
    async fn get(&self, transaction_id: &str) -> anyhow::Result<Option<Booking>>;

    /// All bookings whose snapshot travel date equals `date`.
    async fn find_by_travel_date(&self, date: TravelDate) -> anyhow::Result<Vec<Booking>>;

    /// All bookings made against an operator's buses.
    async fn find_by_operator(&self, operator: &str) -> anyhow::Result<Vec<Booking>>;

    /// All bookings whose contact email equals `email`.
    async fn find_by_contact_email(&self, email: &str) -> anyhow::Result<Vec<Booking>>;
}
