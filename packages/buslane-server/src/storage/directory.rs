//! Auxiliary collections: stations and users.

use async_trait::async_trait;

use buslane_core::{Station, User};

/// The station directory, deduplicated by name.
#[async_trait]
pub trait StationDirectory: Send + Sync {
    /// One-time initialization.
    async fn open(&self) -> anyhow::Result<()>;

    /// Release resources and close connections.
    async fn close(&self) -> anyhow::Result<()>;

    /// Insert a station unless one with the same name exists.
    /// Returns `true` when a new station was inserted.
    async fn insert_unique(&self, station: Station) -> anyhow::Result<bool>;

    /// Every station.
    async fn all(&self) -> anyhow::Result<Vec<Station>>;
}

/// The user collection, keyed by email.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// One-time initialization.
    async fn open(&self) -> anyhow::Result<()>;

    /// Release resources and close connections.
    async fn close(&self) -> anyhow::Result<()>;

    /// Insert or replace the user with this email.
    async fn upsert(&self, user: User) -> anyhow::Result<()>;

    /// Fetch a user by email.
    async fn get(&self, email: &str) -> anyhow::Result<Option<User>>;
}
