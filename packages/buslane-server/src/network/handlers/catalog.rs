//! Bus catalog mutation handlers: registration, availability toggle, and
//! deletion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use buslane_core::{Bus, BusId, Fare, SeatNo, Station, Stoppage};

use super::AppState;
use crate::error::ApiError;

/// A bus as submitted by an operator — everything but the generated id
/// and the booked list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusDraft {
    pub operator: String,
    pub name: String,
    #[serde(default)]
    pub route: Vec<String>,
    #[serde(default)]
    pub stoppages: Vec<Stoppage>,
    pub cost: Fare,
    pub departure_time: String,
    #[serde(default)]
    pub available_seats: Vec<SeatNo>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Body of `POST /buses`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusRequest {
    #[serde(rename = "busInfo")]
    pub bus: BusDraft,
    /// New stations to add to the directory, deduplicated by name.
    #[serde(default)]
    pub stations: Vec<Station>,
}

/// Response of `POST /buses`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBusResponse {
    pub bus: Bus,
    pub stations_inserted: usize,
}

/// `POST /buses` — register a bus and dedup-insert its stations.
pub async fn register_bus_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterBusRequest>,
) -> Result<Response, ApiError> {
    let draft = request.bus;
    if draft.operator.trim().is_empty() || draft.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "missing field: operator or name".to_string(),
        ));
    }

    let mut stations_inserted = 0;
    for station in request.stations {
        if state.stores.stations.insert_unique(station).await? {
            stations_inserted += 1;
        }
    }

    let bus = Bus {
        id: BusId::generate(),
        operator: draft.operator,
        name: draft.name,
        route: draft.route,
        stoppages: draft.stoppages,
        cost: draft.cost,
        departure_time: draft.departure_time,
        available_seats: draft.available_seats,
        booked: Vec::new(),
        available: draft.available,
    };
    state.stores.buses.insert(bus.clone()).await?;
    tracing::info!(bus_id = %bus.id, operator = %bus.operator, "bus registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterBusResponse {
            bus,
            stations_inserted,
        }),
    )
        .into_response())
}

/// Body of `PATCH /buses/{id}/available`.
#[derive(Debug, Deserialize)]
pub struct SetAvailableRequest {
    pub status: bool,
}

/// `PATCH /buses/{id}/available` — toggle the publish flag.
///
/// Idempotent: re-applying the same value is a no-op. 404 when the id
/// does not exist.
pub async fn set_available_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetAvailableRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = BusId::new(id);
    state.queries.set_bus_available(&id, request.status).await?;
    Ok(Json(json!({ "id": id, "available": request.status })))
}

/// `DELETE /buses/{id}` — hard-delete, 404 when missing.
pub async fn delete_bus_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = BusId::new(id);
    state.queries.delete_bus(&id).await?;
    Ok(Json(json!({ "id": id, "deleted": true })))
}
