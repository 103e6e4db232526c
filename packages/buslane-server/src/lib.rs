//! Buslane server — HTTP API for the intercity bus-ticketing platform.
//!
//! Components, leaves first: the bus catalog and booking stores
//! ([`storage`]), the availability search and operator dashboards built on
//! them ([`query`], the search handlers), the booking transaction sequencer
//! ([`booking`]), and the external collaborator interfaces
//! ([`collaborators`]). The [`network`] module carries the axum surface.

pub mod booking;
pub mod collaborators;
pub mod error;
pub mod network;
pub mod query;
pub mod storage;

pub use error::ApiError;
