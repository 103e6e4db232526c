//! Operator dashboard handlers: bus listing, filtered bookings, and
//! account history. All are scoped by the caller's operator grant.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use buslane_core::{BookingFilter, Bus, HistoryQuery};

use super::{AppState, PageQuery};
use crate::error::ApiError;
use crate::query::AccountHistory;

/// `GET /operators/{email}/buses` — the caller's registered buses.
pub async fn operator_buses_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Bus>>, ApiError> {
    Ok(Json(state.queries.buses_for(&email).await?))
}

/// `POST /operators/{email}/bookings` — filtered, paginated bookings.
///
/// `?count=true` returns only the total matching count, which always
/// equals the length of the full unpaginated result for the same filter.
pub async fn operator_bookings_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(page): Query<PageQuery>,
    Json(filter): Json<BookingFilter>,
) -> Result<Response, ApiError> {
    if page.count {
        let count = state.queries.count_bookings_for(&email, &filter).await?;
        return Ok(Json(json!({ "count": count })).into_response());
    }
    let bookings = state
        .queries
        .bookings_for(&email, &filter, page.page_request())
        .await?;
    Ok(Json(bookings).into_response())
}

/// `POST /operators/{email}/history` — buses and bookings narrowed by
/// publish flag, bus name, and an inclusive travel-date range.
pub async fn account_history_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(query): Json<HistoryQuery>,
) -> Result<Json<AccountHistory>, ApiError> {
    Ok(Json(state.queries.account_history(&email, &query).await?))
}
