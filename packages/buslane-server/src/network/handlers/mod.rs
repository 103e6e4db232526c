//! HTTP handler definitions.
//!
//! Defines [`AppState`] (the shared state carried through axum extractors)
//! and re-exports all handler functions for the router.

pub mod bookings;
pub mod catalog;
pub mod health;
pub mod operators;
pub mod search;
pub mod users;

pub use bookings::{
    create_booking_handler, get_booking_handler, payment_intent_handler,
    traveler_bookings_handler,
};
pub use catalog::{delete_bus_handler, register_bus_handler, set_available_handler};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use operators::{
    account_history_handler, operator_bookings_handler, operator_buses_handler,
};
pub use search::{home_handler, search_handler, stations_handler};
pub use users::{get_user_handler, upsert_user_handler};

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;

use buslane_core::PageRequest;

use crate::booking::BookingSequencer;
use crate::network::config::NetworkConfig;
use crate::network::lifecycle::Lifecycle;
use crate::query::OperatorQueryEngine;
use crate::storage::Stores;

/// Shared application state passed to all handlers via `State` extraction.
///
/// Holds `Arc` references so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub sequencer: Arc<BookingSequencer>,
    pub queries: Arc<OperatorQueryEngine>,
    pub lifecycle: Arc<Lifecycle>,
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

/// Pagination query parameters shared by the listing endpoints.
///
/// `?count=true` switches to count-only mode; otherwise `page`/`perPage`
/// select a window.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
    #[serde(default)]
    pub count: bool,
}

impl PageQuery {
    const DEFAULT_PER_PAGE: usize = 10;

    /// The page window, with defaults applied.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(0),
            per_page: self.per_page.unwrap_or(Self::DEFAULT_PER_PAGE),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::collaborators::{
        InMemoryTicketVault, MockGateway, RecordingMailer,
    };

    let stores = Stores::in_memory();
    let sequencer = Arc::new(BookingSequencer::new(
        Arc::clone(&stores.bookings),
        Arc::new(MockGateway::new()),
        Arc::new(RecordingMailer::new()),
        Arc::new(InMemoryTicketVault::new()),
        "usd",
    ));
    let queries = Arc::new(OperatorQueryEngine::new(stores.clone()));
    AppState {
        stores,
        sequencer,
        queries,
        lifecycle: Arc::new(Lifecycle::new()),
        config: Arc::new(NetworkConfig::default()),
        start_time: Instant::now(),
    }
}
