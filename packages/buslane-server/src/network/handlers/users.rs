//! User directory handlers.

use axum::extract::{Path, State};
use axum::Json;

use buslane_core::User;

use super::AppState;
use crate::error::ApiError;

/// `POST /users` — create or update the account for an email.
pub async fn upsert_user_handler(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<User>, ApiError> {
    if user.email.trim().is_empty() {
        return Err(ApiError::Validation("missing field: email".to_string()));
    }
    state.stores.users.upsert(user.clone()).await?;
    Ok(Json(user))
}

/// `GET /users/{email}` — role and operator-scope lookup.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .stores
        .users
        .get(&email)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound { resource: "user" })
}
