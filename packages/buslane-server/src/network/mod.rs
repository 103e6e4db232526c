//! The HTTP surface: configuration, middleware, lifecycle, handlers, and
//! the server module that binds them together.

pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod module;

pub use config::NetworkConfig;
pub use handlers::AppState;
pub use lifecycle::{HealthState, Lifecycle};
pub use module::ServerModule;
