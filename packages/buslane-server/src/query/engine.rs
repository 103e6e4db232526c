//! Paginated and filtered retrieval for dashboards, plus the operator's
//! bus mutations.
//!
//! Admin queries are scoped: the caller's email resolves to an operator
//! name through the user directory, and only that operator's buses and
//! bookings are visible. Count mode always agrees with the full
//! unpaginated result set for the same filter.

use chrono::Local;
use serde::Serialize;

use buslane_core::{
    Booking, BookingFilter, Bus, BusId, HistoryQuery, PageRequest, TravelDate,
};

use crate::error::ApiError;
use crate::storage::Stores;

/// The account-history view: an operator's (possibly narrowed) buses and
/// the bookings made against them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistory {
    pub buses: Vec<Bus>,
    pub bookings: Vec<Booking>,
}

/// Read/mutate surface for operator dashboards and traveler history.
pub struct OperatorQueryEngine {
    stores: Stores,
}

impl OperatorQueryEngine {
    /// Wires the engine to the shared stores.
    #[must_use]
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Resolves the operator scope for an admin's email.
    async fn scope(&self, email: &str) -> Result<String, ApiError> {
        let user = self
            .stores
            .users
            .get(email)
            .await?
            .ok_or(ApiError::NotFound { resource: "user" })?;
        user.operator_scope()
            .map(str::to_string)
            .ok_or(ApiError::NotFound {
                resource: "operator scope",
            })
    }

    /// All buses registered by the caller's operator.
    ///
    /// # Errors
    ///
    /// `NotFound` when the email is unknown or carries no operator scope.
    pub async fn buses_for(&self, email: &str) -> Result<Vec<Bus>, ApiError> {
        let operator = self.scope(email).await?;
        Ok(self.stores.buses.find_by_operator(&operator).await?)
    }

    /// One page of the caller's operator bookings matching `filter`.
    pub async fn bookings_for(
        &self,
        email: &str,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>, ApiError> {
        let all = self.filtered_bookings(email, filter).await?;
        Ok(page.apply(all))
    }

    /// Total operator bookings matching `filter`.
    ///
    /// Equals the length of the full unpaginated result set — paging the
    /// same filter over all pages yields exactly this many documents.
    pub async fn count_bookings_for(
        &self,
        email: &str,
        filter: &BookingFilter,
    ) -> Result<usize, ApiError> {
        Ok(self.filtered_bookings(email, filter).await?.len())
    }

    async fn filtered_bookings(
        &self,
        email: &str,
        filter: &BookingFilter,
    ) -> Result<Vec<Booking>, ApiError> {
        let operator = self.scope(email).await?;
        let mut bookings = self.stores.bookings.find_by_operator(&operator).await?;
        bookings.retain(|b| filter.matches(b));
        Ok(bookings)
    }

    /// The account-history view for the caller's operator.
    pub async fn account_history(
        &self,
        email: &str,
        query: &HistoryQuery,
    ) -> Result<AccountHistory, ApiError> {
        self.account_history_at(email, query, TravelDate(Local::now().date_naive()))
            .await
    }

    /// Deterministic variant of [`account_history`](Self::account_history):
    /// `today` supplies the default for missing date-range bounds.
    pub async fn account_history_at(
        &self,
        email: &str,
        query: &HistoryQuery,
        today: TravelDate,
    ) -> Result<AccountHistory, ApiError> {
        let operator = self.scope(email).await?;

        let mut buses = match query.availability {
            Some(flag) => {
                self.stores
                    .buses
                    .find_by_operator_and_availability(&operator, flag)
                    .await?
            }
            None => self.stores.buses.find_by_operator(&operator).await?,
        };
        if let Some(name) = query.bus_filter() {
            buses.retain(|b| b.name == name);
        }

        let mut bookings = self.stores.bookings.find_by_operator(&operator).await?;
        if query.has_date_range() {
            let (from, to) = query.date_range(today);
            bookings.retain(|b| b.bus_snapshot.date >= from && b.bus_snapshot.date <= to);
        }

        Ok(AccountHistory { buses, bookings })
    }

    /// One page of a traveler's own bookings, by contact email.
    pub async fn customer_history(
        &self,
        email: &str,
        page: PageRequest,
    ) -> Result<Vec<Booking>, ApiError> {
        let all = self.stores.bookings.find_by_contact_email(email).await?;
        Ok(page.apply(all))
    }

    /// Total number of a traveler's bookings.
    pub async fn count_customer_history(&self, email: &str) -> Result<usize, ApiError> {
        Ok(self
            .stores
            .bookings
            .find_by_contact_email(email)
            .await?
            .len())
    }

    /// Sets a bus's publish flag. Re-applying the same value is a no-op.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not exist.
    pub async fn set_bus_available(
        &self,
        id: &BusId,
        available: bool,
    ) -> Result<(), ApiError> {
        if self.stores.buses.set_available(id, available).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound { resource: "bus" })
        }
    }

    /// Hard-deletes a bus.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id does not exist.
    pub async fn delete_bus(&self, id: &BusId) -> Result<(), ApiError> {
        if self.stores.buses.delete(id).await? {
            tracing::info!(bus_id = %id, "bus deleted");
            Ok(())
        } else {
            Err(ApiError::NotFound { resource: "bus" })
        }
    }
}
