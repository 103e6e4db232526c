//! Buslane core — domain documents and pure seat-inventory logic for an
//! intercity bus-ticketing platform.
//!
//! This crate has no I/O. It defines the bus, booking, station, and user
//! documents, and the read-time availability overlay that reconciles a bus's
//! static seat map with the bookings recorded against it.

pub mod availability;
pub mod booking;
pub mod bus;
pub mod filter;
pub mod types;
pub mod user;

pub use availability::{candidate_buses, resolve_availability};
pub use booking::{Booking, BusSnapshot, ContactDetails, Passenger};
pub use bus::{Bus, Station, Stoppage};
pub use filter::{BookingFilter, HistoryQuery, PageRequest};
pub use types::{BusId, Fare, SeatNo, TravelDate};
pub use user::{Role, User};
