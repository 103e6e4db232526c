//! Traveler-facing search: route availability, stations, and the home
//! summary.

use std::collections::BTreeSet;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use buslane_core::{resolve_availability, Bus, Station, TravelDate};

use super::AppState;
use crate::error::ApiError;

/// Body of `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

fn required<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str, ApiError> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("missing field: {name}")))
}

/// `POST /search` — live availability for a route and travel date.
///
/// Selects published buses serving both stoppages, then overlays the
/// date's bookings onto each bus's seat map. Read-only: nothing is
/// written back to the catalog.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<Bus>>, ApiError> {
    let from = required(request.from.as_deref(), "from")?;
    let to = required(request.to.as_deref(), "to")?;
    let date_str = required(request.date.as_deref(), "date")?;
    let date = TravelDate::parse(date_str)
        .ok_or_else(|| ApiError::Validation(format!("invalid travel date: {date_str}")))?;

    let buses = state.stores.buses.find_serving(from, to).await?;
    let bookings = state.stores.bookings.find_by_travel_date(date).await?;

    Ok(Json(resolve_availability(buses, &bookings, date)))
}

/// `GET /stations` — every station in the directory.
pub async fn stations_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Station>>, ApiError> {
    Ok(Json(state.stores.stations.all().await?))
}

/// Home-page summary: distinct operators and the routes on offer.
#[derive(Debug, Serialize)]
pub struct HomeSummary {
    pub operators: Vec<String>,
    pub routes: Vec<Vec<String>>,
}

/// `GET /home` — operators and routes for the landing page.
pub async fn home_handler(
    State(state): State<AppState>,
) -> Result<Json<HomeSummary>, ApiError> {
    let buses = state.stores.buses.all().await?;
    let operators: BTreeSet<String> = buses.iter().map(|b| b.operator.clone()).collect();
    let routes = buses.into_iter().map(|b| b.route).collect();

    Ok(Json(HomeSummary {
        operators: operators.into_iter().collect(),
        routes,
    }))
}
