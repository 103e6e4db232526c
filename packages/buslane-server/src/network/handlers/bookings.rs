//! Booking pipeline handlers: payment intents, booking submission, and
//! traveler-side lookups.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use buslane_core::{Booking, Fare};

use super::{AppState, PageQuery};
use crate::collaborators::PaymentIntent;
use crate::error::ApiError;

/// Body of `POST /payment-intent`.
#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(default)]
    pub fare: Option<Fare>,
}

/// `POST /payment-intent` — quote a fare with the payment collaborator.
///
/// The gateway's client secret is forwarded unmodified. Nothing is
/// persisted here.
pub async fn payment_intent_handler(
    State(state): State<AppState>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntent>, ApiError> {
    let fare = request
        .fare
        .ok_or_else(|| ApiError::Validation("missing field: fare".to_string()))?;
    let intent = state.sequencer.quote(fare).await?;
    Ok(Json(intent))
}

/// `POST /bookings` — submit the full booking document after payment.
///
/// The insert is the only durable write of the pipeline; it is tracked as
/// in-flight so graceful shutdown waits for it. Conflicts come back as 409
/// with distinguishable codes.
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Json(booking): Json<Booking>,
) -> Result<Response, ApiError> {
    let _guard = state.lifecycle.in_flight_guard();
    let confirmed = state.sequencer.book(booking).await?;
    Ok((StatusCode::CREATED, Json(confirmed)).into_response())
}

/// `GET /bookings/{transaction_id}` — ticket verification lookup.
pub async fn get_booking_handler(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    state
        .stores
        .bookings
        .get(&transaction_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: "booking",
        })
}

/// `GET /travelers/{email}/bookings` — a traveler's own booking history,
/// paginated, or just the total with `?count=true`.
pub async fn traveler_bookings_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    if query.count {
        let count = state.queries.count_customer_history(&email).await?;
        return Ok(Json(json!({ "count": count })).into_response());
    }
    let bookings = state
        .queries
        .customer_history(&email, query.page_request())
        .await?;
    Ok(Json(bookings).into_response())
}

#[cfg(test)]
mod tests {
    use buslane_core::{
        BusId, BusSnapshot, ContactDetails, Passenger, SeatNo, TravelDate,
    };

    use super::*;
    use crate::network::handlers::test_state;

    fn booking(txn: &str, email: &str, date: &str, seats: &[u32]) -> Booking {
        let date = TravelDate::parse(date).unwrap();
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
                email: email.to_string(),
                phone: "000".to_string(),
            },
            date,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn payment_intent_returns_the_client_secret() {
        let state = test_state();
        let response = payment_intent_handler(
            State(state),
            Json(PaymentIntentRequest {
                fare: Some(Fare(12.5)),
            }),
        )
        .await
        .unwrap();
        assert!(response.0.client_secret.starts_with("pi_mock_secret_"));
    }

    #[tokio::test]
    async fn payment_intent_requires_a_fare() {
        let state = test_state();
        let result =
            payment_intent_handler(State(state), Json(PaymentIntentRequest { fare: None }))
                .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn submitted_bookings_become_retrievable() {
        let state = test_state();
        create_booking_handler(
            State(state.clone()),
            Json(booking("txn-1", "rider@example.com", "2024-07-15", &[2])),
        )
        .await
        .unwrap();

        let fetched = get_booking_handler(State(state), Path("txn-1".to_string()))
            .await
            .unwrap();
        assert_eq!(fetched.0.transaction_id, "txn-1");
    }

    #[tokio::test]
    async fn duplicate_submission_conflicts() {
        let state = test_state();
        let doc = booking("txn-1", "rider@example.com", "2024-07-15", &[2]);
        create_booking_handler(State(state.clone()), Json(doc.clone()))
            .await
            .unwrap();

        let err = create_booking_handler(State(state), Json(doc))
            .await
            .unwrap_err();
        // A resubmitted document hits the seat check as well as the id
        // check; either way the client sees a 409.
        assert!(matches!(
            err,
            ApiError::DuplicateTransaction { .. } | ApiError::SeatsTaken { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_booking_lookup_is_not_found() {
        let state = test_state();
        let result = get_booking_handler(State(state), Path("ghost".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));
    }

    #[tokio::test]
    async fn traveler_history_supports_count_and_pages() {
        let state = test_state();
        for i in 0..3 {
            create_booking_handler(
                State(state.clone()),
                Json(booking(
                    &format!("txn-{i}"),
                    "rider@example.com",
                    &format!("2024-07-1{i}"),
                    &[1],
                )),
            )
            .await
            .unwrap();
        }

        let count_response = traveler_bookings_handler(
            State(state.clone()),
            Path("rider@example.com".to_string()),
            Query(PageQuery {
                count: true,
                ..PageQuery::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(count_response.status(), StatusCode::OK);

        let page_response = traveler_bookings_handler(
            State(state),
            Path("rider@example.com".to_string()),
            Query(PageQuery {
                page: Some(0),
                per_page: Some(2),
                count: false,
            }),
        )
        .await
        .unwrap();
        assert_eq!(page_response.status(), StatusCode::OK);
    }
}
