//! Booking transaction sequencer.
//!
//! Sequences the payment → booking → ticket pipeline:
//!
//! 1. **Quoted** — [`BookingSequencer::quote`] asks the payment gateway for
//!    an intent in minor currency units and forwards the client secret
//!    unmodified. Nothing is persisted.
//! 2. **Paid** — confirmation happens client-side against the gateway; the
//!    sequencer only sees the resulting transaction id.
//! 3. **Booked** — [`BookingSequencer::book`] performs the single durable
//!    write through the store's atomic `insert_if_absent`, which rejects
//!    reused transaction ids and overlapping seats.
//! 4. **Ticketed** — rendering, storage, and the confirmation mail run as a
//!    detached best-effort task. A failure there is logged and must never
//!    roll back the paid booking.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tracing::{info, warn};

use buslane_core::{Booking, Fare, SeatNo};

use crate::collaborators::{Attachment, Mailer, PaymentGateway, PaymentIntent, TicketVault};
use crate::error::ApiError;
use crate::storage::BookingStore;

/// Orchestrates one paid reservation per transaction identifier.
pub struct BookingSequencer {
    bookings: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
    tickets: Arc<dyn TicketVault>,
    currency: String,
}

impl BookingSequencer {
    /// Wires the sequencer to its store and collaborators.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
        tickets: Arc<dyn TicketVault>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            bookings,
            payments,
            mailer,
            tickets,
            currency: currency.into(),
        }
    }

    /// Creates a payment intent for `fare` and returns the gateway's client
    /// secret unmodified.
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive fare; `Collaborator` when the
    /// gateway fails — fatal to this request, nothing was persisted.
    pub async fn quote(&self, fare: Fare) -> Result<PaymentIntent, ApiError> {
        if !fare.0.is_finite() || fare.0 <= 0.0 {
            return Err(ApiError::Validation(format!(
                "fare must be positive, got {}",
                fare.0
            )));
        }
        let intent = self
            .payments
            .create_intent(fare.minor_units(), &self.currency)
            .await
            .map_err(ApiError::Collaborator)?;
        counter!("buslane_payment_intents_total").increment(1);
        Ok(intent)
    }

    /// Persists a booking exactly once, then triggers ticket issuance.
    ///
    /// # Errors
    ///
    /// `Validation` for an incomplete document; `DuplicateTransaction` or
    /// `SeatsTaken` when the conditional insert is rejected.
    pub async fn book(&self, mut booking: Booking) -> Result<Booking, ApiError> {
        validate(&booking)?;
        booking.created_at = Utc::now().timestamp_millis();

        if let Err(err) = self.bookings.insert_if_absent(booking.clone()).await {
            counter!("buslane_booking_conflicts_total").increment(1);
            return Err(err.into());
        }
        counter!("buslane_bookings_created_total").increment(1);
        info!(
            transaction_id = %booking.transaction_id,
            bus_id = %booking.bus_snapshot.bus_id,
            date = %booking.bus_snapshot.date,
            seats = booking.persons.len(),
            "booking confirmed"
        );

        self.spawn_ticket_issue(booking.clone());
        Ok(booking)
    }

    /// Runs ticket issuance detached from the request.
    fn spawn_ticket_issue(&self, booking: Booking) {
        let mailer = Arc::clone(&self.mailer);
        let tickets = Arc::clone(&self.tickets);
        tokio::spawn(async move {
            if let Err(err) = issue_ticket(&*tickets, &*mailer, &booking).await {
                counter!("buslane_ticket_issue_failures_total").increment(1);
                warn!(
                    transaction_id = %booking.transaction_id,
                    error = %err,
                    "ticket issuance failed; booking remains confirmed"
                );
            }
        });
    }
}

/// Renders, stores, and mails the ticket for a confirmed booking.
///
/// # Errors
///
/// Returns the first collaborator failure; callers treat it as retryable.
pub async fn issue_ticket(
    tickets: &dyn TicketVault,
    mailer: &dyn Mailer,
    booking: &Booking,
) -> anyhow::Result<()> {
    let bytes = tickets.render_ticket(booking).await?;
    let name = format!("{}-ticket.pdf", booking.transaction_id);
    let file_id = tickets.store_ticket(bytes.clone(), &name).await?;

    let subject = format!(
        "Payment confirmation for {}",
        booking.bus_snapshot.operator
    );
    mailer
        .send(
            &booking.contact.email,
            &subject,
            &confirmation_body(booking, &file_id),
            vec![Attachment::pdf(name, bytes)],
        )
        .await?;
    Ok(())
}

/// The confirmation mail body.
fn confirmation_body(booking: &Booking, file_id: &str) -> String {
    let snapshot = &booking.bus_snapshot;
    format!(
        "<p>Dear {name},</p>\
         <p>Your seat booking for <b>{from} to {to}</b> is confirmed. \
         Please keep your transaction id (<b>{txn}</b>) safe.</p>\
         <p>Your ticket is stored as <b>{file_id}</b>.</p>\
         <ol>\
         <li>Total passengers: {count}</li>\
         <li>Departure: {from} ({dep})</li>\
         <li>Fare: {fare}</li>\
         <li>Contact email: {email}</li>\
         </ol>",
        name = booking.persons.first().map_or("traveler", |p| p.name.as_str()),
        from = snapshot.from,
        to = snapshot.to,
        txn = booking.transaction_id,
        count = booking.persons.len(),
        dep = snapshot.departure_time,
        fare = booking.total_fare().0,
        email = booking.contact.email,
    )
}

/// Rejects incomplete booking documents before the durable write.
fn validate(booking: &Booking) -> Result<(), ApiError> {
    if booking.transaction_id.trim().is_empty() {
        return Err(ApiError::Validation(
            "missing field: transactionID".to_string(),
        ));
    }
    if booking.persons.is_empty() {
        return Err(ApiError::Validation(
            "a booking needs at least one passenger".to_string(),
        ));
    }
    if booking.contact.email.trim().is_empty() {
        return Err(ApiError::Validation(
            "missing field: passengerDetails.email".to_string(),
        ));
    }
    let mut seats: Vec<SeatNo> = booking.seat_numbers();
    seats.sort_unstable();
    seats.dedup();
    if seats.len() != booking.persons.len() {
        return Err(ApiError::Validation(
            "passengers claim duplicate seats".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use buslane_core::{
        BusId, BusSnapshot, ContactDetails, Fare, Passenger, TravelDate,
    };

    use super::*;
    use crate::collaborators::{
        InMemoryTicketVault, MockGateway, RecordingMailer,
    };
    use crate::storage::MemoryBookingStore;

    fn booking(txn: &str, seats: &[u32]) -> Booking {
        let date = TravelDate::parse("2024-07-15").unwrap();
        Booking {
            transaction_id: txn.to_string(),
            bus_snapshot: BusSnapshot {
                bus_id: BusId::new("b1"),
                operator: "Greenline".to_string(),
                bus_name: "Night Coach".to_string(),
                route: vec!["X".to_string(), "Z".to_string()],
                from: "X".to_string(),
                to: "Z".to_string(),
                date,
                departure_time: "22:30".to_string(),
                cost: Fare(12.5),
            },
            persons: seats
                .iter()
                .map(|s| Passenger {
                    seat_no: SeatNo(*s),
                    name: format!("p{s}"),
                    gender: None,
                    age: None,
                })
                .collect(),
            contact: ContactDetails {
                email: "rider@example.com".to_string(),
                phone: "000".to_string(),
            },
            date,
            created_at: 0,
        }
    }

    struct Rig {
        sequencer: BookingSequencer,
        store: Arc<MemoryBookingStore>,
        gateway: Arc<MockGateway>,
        mailer: Arc<RecordingMailer>,
    }

    fn rig() -> Rig {
        let store = Arc::new(MemoryBookingStore::new());
        let gateway = Arc::new(MockGateway::new());
        let mailer = Arc::new(RecordingMailer::new());
        let tickets = Arc::new(InMemoryTicketVault::new());
        let sequencer = BookingSequencer::new(
            Arc::clone(&store) as Arc<dyn BookingStore>,
            Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
            Arc::clone(&mailer) as Arc<dyn Mailer>,
            tickets,
            "usd",
        );
        Rig {
            sequencer,
            store,
            gateway,
            mailer,
        }
    }

    #[tokio::test]
    async fn quote_converts_fare_to_minor_units_and_forwards_the_secret() {
        let rig = rig();
        let intent = rig.sequencer.quote(Fare(12.5)).await.unwrap();

        assert_eq!(rig.gateway.calls(), vec![(1250, "usd".to_string())]);
        assert!(intent.client_secret.starts_with("pi_mock_secret_"));
    }

    #[tokio::test]
    async fn quote_rejects_non_positive_fares() {
        let rig = rig();
        assert!(matches!(
            rig.sequencer.quote(Fare(0.0)).await,
            Err(ApiError::Validation(_))
        ));
        assert!(rig.gateway.calls().is_empty(), "gateway must not be called");
    }

    #[tokio::test]
    async fn quote_surfaces_gateway_failure_as_collaborator_error() {
        let rig = rig();
        rig.gateway.set_decline(true);
        assert!(matches!(
            rig.sequencer.quote(Fare(10.0)).await,
            Err(ApiError::Collaborator(_))
        ));
    }

    #[tokio::test]
    async fn book_persists_once_and_stamps_creation_time() {
        let rig = rig();
        let confirmed = rig.sequencer.book(booking("txn-1", &[2])).await.unwrap();
        assert!(confirmed.created_at > 0);

        let stored = rig.store.get("txn-1").await.unwrap().unwrap();
        assert_eq!(stored.transaction_id, "txn-1");
    }

    #[tokio::test]
    async fn reused_transaction_id_is_a_conflict() {
        let rig = rig();
        rig.sequencer.book(booking("txn-1", &[2])).await.unwrap();

        let err = rig
            .sequencer
            .book(booking("txn-1", &[3]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateTransaction { .. }));
    }

    #[tokio::test]
    async fn overlapping_seats_are_a_distinct_conflict() {
        let rig = rig();
        rig.sequencer.book(booking("txn-1", &[5])).await.unwrap();

        let err = rig
            .sequencer
            .book(booking("txn-2", &[5]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SeatsTaken { seats } if seats == vec![SeatNo(5)]));
    }

    #[tokio::test]
    async fn incomplete_documents_never_reach_the_store() {
        let rig = rig();

        let mut no_txn = booking("", &[1]);
        no_txn.transaction_id = "  ".to_string();
        assert!(matches!(
            rig.sequencer.book(no_txn).await,
            Err(ApiError::Validation(_))
        ));

        let no_persons = booking("txn-1", &[]);
        assert!(matches!(
            rig.sequencer.book(no_persons).await,
            Err(ApiError::Validation(_))
        ));

        let dup_seats = booking("txn-1", &[4, 4]);
        assert!(matches!(
            rig.sequencer.book(dup_seats).await,
            Err(ApiError::Validation(_))
        ));

        assert!(rig.store.get("txn-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ticket_failure_never_affects_the_booking() {
        let rig = rig();
        rig.mailer.set_fail(true);

        rig.sequencer.book(booking("txn-1", &[2])).await.unwrap();

        // Give the detached issuance task time to fail.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rig.store.get("txn-1").await.unwrap().is_some());
        assert!(rig.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn issue_ticket_sends_the_confirmation_with_attachment() {
        let mailer = RecordingMailer::new();
        let vault = InMemoryTicketVault::new();
        let b = booking("txn-9", &[3, 4]);

        issue_ticket(&vault, &mailer, &b).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "rider@example.com");
        assert!(sent[0].subject.contains("Greenline"));
        assert!(sent[0].html_body.contains("txn-9"));
        assert_eq!(sent[0].attachment_names, vec!["txn-9-ticket.pdf"]);
    }
}
