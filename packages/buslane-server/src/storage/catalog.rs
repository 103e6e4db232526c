//! Bus catalog store interface.

use async_trait::async_trait;

use buslane_core::{Bus, BusId};

/// The bus collection: static schedules, seat maps, and publish flags.
///
/// Written only by operator-admin actions (register, availability toggle,
/// delete); read by the availability search and the dashboards.
#[async_trait]
pub trait BusCatalog: Send + Sync {
    /// One-time initialization (e.g., connect, create tables).
    async fn open(&self) -> anyhow::Result<()>;

    /// Release resources and close connections.
    async fn close(&self) -> anyhow::Result<()>;

    /// Insert a newly registered bus.
    async fn insert(&self, bus: Bus) -> anyhow::Result<()>;

    /// Fetch a bus by id.
    async fn get(&self, id: &BusId) -> anyhow::Result<Option<Bus>>;

    /// All published buses whose stoppage set contains both named stops.
    async fn find_serving(&self, from: &str, to: &str) -> anyhow::Result<Vec<Bus>>;

    /// All buses belonging to an operator.
    async fn find_by_operator(&self, operator: &str) -> anyhow::Result<Vec<Bus>>;

    /// An operator's buses narrowed by publish flag.
    async fn find_by_operator_and_availability(
        &self,
        operator: &str,
        available: bool,
    ) -> anyhow::Result<Vec<Bus>>;

    /// Set the publish flag. Returns `false` when the id does not exist.
    ///
    /// Re-applying the same value is a no-op on the stored flag.
    async fn set_available(&self, id: &BusId, available: bool) -> anyhow::Result<bool>;

    /// Hard-delete a bus. Returns `false` when the id does not exist.
    async fn delete(&self, id: &BusId) -> anyhow::Result<bool>;

    /// Every bus document.
    async fn all(&self) -> anyhow::Result<Vec<Bus>>;
}
