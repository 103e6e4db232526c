//! Request-boundary error taxonomy.
//!
//! Every handler returns [`ApiError`] on failure; the [`IntoResponse`]
//! mapping turns it into a structured JSON body so nothing crashes the
//! serving process. The two conflict variants stay distinguishable on the
//! wire so clients can decide between retrying payment and reselecting
//! seats.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use buslane_core::SeatNo;

use crate::storage::InsertError;

/// Errors surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("transaction {transaction_id} is already booked")]
    DuplicateTransaction { transaction_id: String },
    #[error("seats [{}] are already taken for this bus and date", seat_list(.seats))]
    SeatsTaken { seats: Vec<SeatNo> },
    #[error("invalid request: {0}")]
    Validation(String),
    /// A store or external collaborator failed. Fatal to the current
    /// request only.
    #[error("collaborator failure: {0}")]
    Collaborator(#[from] anyhow::Error),
}

fn seat_list(seats: &[SeatNo]) -> String {
    seats
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    /// Stable machine-readable code for the JSON body.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::DuplicateTransaction { .. } => "duplicate_transaction",
            Self::SeatsTaken { .. } => "seats_taken",
            Self::Validation(_) => "validation",
            Self::Collaborator(_) => "collaborator_failure",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateTransaction { .. } | Self::SeatsTaken { .. } => {
                StatusCode::CONFLICT
            }
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Collaborator(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<InsertError> for ApiError {
    fn from(err: InsertError) -> Self {
        match err {
            InsertError::DuplicateTransaction(transaction_id) => {
                Self::DuplicateTransaction { transaction_id }
            }
            InsertError::SeatsTaken(seats) => Self::SeatsTaken { seats },
            InsertError::Backend(err) => Self::Collaborator(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
