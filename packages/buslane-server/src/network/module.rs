//! Server module with deferred startup lifecycle.
//!
//! `new()` wires shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves. The
//! separation lets the binary seed stores or stand up collaborators
//! between binding and serving.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::booking::BookingSequencer;
use crate::query::OperatorQueryEngine;
use crate::storage::Stores;

use super::config::NetworkConfig;
use super::handlers::{
    account_history_handler, create_booking_handler, delete_bus_handler,
    get_booking_handler, get_user_handler, health_handler, home_handler,
    liveness_handler, operator_bookings_handler, operator_buses_handler,
    payment_intent_handler, readiness_handler, register_bus_handler, search_handler,
    set_available_handler, stations_handler, traveler_bookings_handler,
    upsert_user_handler, AppState,
};
use super::lifecycle::Lifecycle;
use super::middleware::build_http_layers;

/// Manages the HTTP server lifecycle around the shared [`AppState`].
pub struct ServerModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    state: AppState,
}

impl ServerModule {
    /// Creates the module and its shared state without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        stores: Stores,
        sequencer: Arc<BookingSequencer>,
        queries: Arc<OperatorQueryEngine>,
    ) -> Self {
        let state = AppState {
            stores,
            sequencer,
            queries,
            lifecycle: Arc::new(Lifecycle::new()),
            config: Arc::new(config.clone()),
            start_time: Instant::now(),
        };
        Self {
            config,
            listener: None,
            state,
        }
    }

    /// Shared lifecycle handle for probes and external shutdown triggers.
    #[must_use]
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.state.lifecycle)
    }

    /// Assembles the axum router with all routes and middleware.
    pub fn build_router(&self) -> Router {
        let layers = build_http_layers(&self.config);

        Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route("/search", post(search_handler))
            .route("/stations", get(stations_handler))
            .route("/home", get(home_handler))
            .route("/payment-intent", post(payment_intent_handler))
            .route("/bookings", post(create_booking_handler))
            .route("/bookings/{transaction_id}", get(get_booking_handler))
            .route(
                "/travelers/{email}/bookings",
                get(traveler_bookings_handler),
            )
            .route("/operators/{email}/buses", get(operator_buses_handler))
            .route(
                "/operators/{email}/bookings",
                post(operator_bookings_handler),
            )
            .route("/operators/{email}/history", post(account_history_handler))
            .route("/buses", post(register_bus_handler))
            .route("/buses/{id}/available", patch(set_available_handler))
            .route("/buses/{id}", delete(delete_bus_handler))
            .route("/users", post(upsert_user_handler))
            .route("/users/{email}", get(get_user_handler))
            .layer(layers)
            .with_state(self.state.clone())
    }

    /// Binds the TCP listener. Returns the actual bound port (relevant
    /// when the configured port is 0).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("listening on {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until `shutdown` resolves, then drains.
    ///
    /// After the shutdown signal the lifecycle moves to Draining and waits
    /// up to 30 seconds for in-flight requests (booking inserts) to finish
    /// before reporting Stopped.
    ///
    /// # Errors
    ///
    /// Returns an error on a fatal I/O failure.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called first.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let router = self.build_router();
        let lifecycle = Arc::clone(&self.state.lifecycle);

        lifecycle.set_ready();

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        lifecycle.trigger_shutdown();
        if lifecycle.wait_for_drain(Duration::from_secs(30)).await {
            info!("all in-flight requests drained");
        } else {
            warn!("drain timeout expired with in-flight requests remaining");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::handlers::test_state;
    use super::*;
    use crate::network::lifecycle::HealthState;

    fn module() -> ServerModule {
        let state = test_state();
        ServerModule::new(
            NetworkConfig::default(),
            state.stores,
            state.sequencer,
            state.queries,
        )
    }

    #[test]
    fn new_does_not_bind() {
        let module = module();
        assert!(module.listener.is_none());
        assert_eq!(module.lifecycle().health_state(), HealthState::Starting);
    }

    #[test]
    fn build_router_wires_all_routes() {
        let _router = module().build_router();
    }

    #[tokio::test]
    async fn start_binds_an_os_assigned_port() {
        let mut module = module();
        let port = module.start().await.expect("bind should succeed");
        assert!(port > 0);
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_drains_and_stops_on_shutdown() {
        let mut module = module();
        module.start().await.unwrap();
        let lifecycle = module.lifecycle();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(module.serve(async move {
            rx.await.ok();
        }));

        // Let the server come up, then signal shutdown.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(lifecycle.health_state(), HealthState::Ready);

        tx.send(()).unwrap();
        server.await.unwrap().unwrap();
        assert_eq!(lifecycle.health_state(), HealthState::Stopped);
    }
}
