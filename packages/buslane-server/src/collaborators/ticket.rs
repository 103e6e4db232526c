//! Ticket rendering and storage interface.
//!
//! Rendering and upload are best-effort post-booking steps. A failure here
//! is logged and retried out of band; it never rolls back a paid booking.

use async_trait::async_trait;
use dashmap::DashMap;

use buslane_core::Booking;

/// Abstraction over the ticket document pipeline: render the booking into
/// printable bytes, then store them under a retrievable file id.
#[async_trait]
pub trait TicketVault: Send + Sync {
    /// Render a booking into ticket document bytes.
    async fn render_ticket(&self, booking: &Booking) -> anyhow::Result<Vec<u8>>;

    /// Store rendered bytes under `name`. Returns the stored file id.
    async fn store_ticket(&self, bytes: Vec<u8>, name: &str) -> anyhow::Result<String>;
}

/// The printable ticket body for a booking.
#[must_use]
pub fn ticket_html(booking: &Booking) -> String {
    let snapshot = &booking.bus_snapshot;
    let seats = booking
        .seat_numbers()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "<html><body>\
         <h2>{operator}</h2>\
         <h5>{bus_name}</h5>\
         <p><b>Name:</b> {name}</p>\
         <p><b>Phone:</b> {phone}</p>\
         <p><b>Email:</b> {email}</p>\
         <p><b>Transaction:</b> {txn}</p>\
         <p><b>Destination:</b> {from} - {to}</p>\
         <p><b>Date and time:</b> {date} [ {dep} ]</p>\
         <p><b>Passengers:</b> {count}</p>\
         <p><b>Seats:</b> {seats}</p>\
         </body></html>",
        operator = snapshot.operator,
        bus_name = snapshot.bus_name,
        name = booking
            .persons
            .first()
            .map_or("", |p| p.name.as_str()),
        phone = booking.contact.phone,
        email = booking.contact.email,
        txn = booking.transaction_id,
        from = snapshot.from,
        to = snapshot.to,
        date = snapshot.date,
        dep = snapshot.departure_time,
        count = booking.persons.len(),
    )
}

/// In-process vault for development and tests: renders the HTML ticket body
/// and keeps stored documents in memory.
pub struct InMemoryTicketVault {
    files: DashMap<String, Vec<u8>>,
}

impl InMemoryTicketVault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    /// Fetch a stored document by file id.
    #[must_use]
    pub fn get(&self, file_id: &str) -> Option<Vec<u8>> {
        self.files.get(file_id).map(|f| f.clone())
    }
}

impl Default for InMemoryTicketVault {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketVault for InMemoryTicketVault {
    async fn render_ticket(&self, booking: &Booking) -> anyhow::Result<Vec<u8>> {
        Ok(ticket_html(booking).into_bytes())
    }

    async fn store_ticket(&self, bytes: Vec<u8>, name: &str) -> anyhow::Result<String> {
        let file_id = format!("{}-{name}", uuid::Uuid::new_v4());
        self.files.insert(file_id.clone(), bytes);
        tracing::info!(file_id, "ticket stored");
        Ok(file_id)
    }
}
