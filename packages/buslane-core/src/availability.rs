//! Read-time availability overlay.
//!
//! The catalog's persisted seat state is bus-level; the per-date truth is
//! derived here by subtracting the seats sold by bookings for the requested
//! travel date from each candidate bus's free list. The overlay produces
//! derived views only — callers never write the result back to the catalog.

use std::collections::{BTreeSet, HashMap};

use crate::booking::Booking;
use crate::bus::Bus;
use crate::types::{BusId, SeatNo, TravelDate};

/// Filters buses down to search candidates: published, and serving both
/// named stoppages (membership only — route order is not validated).
#[must_use]
pub fn candidate_buses(buses: Vec<Bus>, from: &str, to: &str) -> Vec<Bus> {
    buses
        .into_iter()
        .filter(|bus| bus.available && bus.serves(from, to))
        .collect()
}

/// Seats claimed per bus by bookings travelling on `date`.
#[must_use]
pub fn sold_seats_by_bus(
    bookings: &[Booking],
    date: TravelDate,
) -> HashMap<BusId, BTreeSet<SeatNo>> {
    let mut sold: HashMap<BusId, BTreeSet<SeatNo>> = HashMap::new();
    for booking in bookings.iter().filter(|b| b.bus_snapshot.date == date) {
        sold.entry(booking.bus_snapshot.bus_id.clone())
            .or_default()
            .extend(booking.seat_numbers());
    }
    sold
}

/// Applies the overlay to a single bus: removes `sold` seats from the free
/// list and merges them into `booked`, deduplicated and ascending.
#[must_use]
pub fn overlay_bus(mut bus: Bus, sold: &BTreeSet<SeatNo>) -> Bus {
    if sold.is_empty() {
        return bus;
    }
    bus.available_seats.retain(|seat| !sold.contains(seat));

    let mut booked: BTreeSet<SeatNo> = bus.booked.iter().copied().collect();
    booked.extend(sold.iter().copied());
    bus.booked = booked.into_iter().collect();
    bus
}

/// Resolves live availability for candidate buses on a travel date.
///
/// A bus with no matching bookings passes through unchanged. A booking
/// referencing a bus id absent from `buses` is silently ignored.
#[must_use]
pub fn resolve_availability(
    buses: Vec<Bus>,
    bookings: &[Booking],
    date: TravelDate,
) -> Vec<Bus> {
    let sold = sold_seats_by_bus(bookings, date);
    buses
        .into_iter()
        .map(|bus| match sold.get(&bus.id) {
            Some(seats) => overlay_bus(bus, seats),
            None => bus,
        })
        .collect()
}
