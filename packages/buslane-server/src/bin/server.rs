//! Buslane server binary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use buslane_server::booking::BookingSequencer;
use buslane_server::collaborators::{
    InMemoryTicketVault, LogMailer, MockGateway, PaymentGateway, StripeGateway,
};
use buslane_server::network::{NetworkConfig, ServerModule};
use buslane_server::query::OperatorQueryEngine;
use buslane_server::storage::Stores;

/// Command-line and environment configuration.
#[derive(Debug, Parser)]
#[command(name = "buslane-server", about = "Intercity bus-ticketing API server")]
struct Args {
    /// Bind address.
    #[arg(long, env = "BUSLANE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Allowed CORS origins, comma-separated. "*" allows any origin.
    #[arg(
        long = "cors-origin",
        env = "BUSLANE_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    cors_origins: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "BUSLANE_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Payment gateway secret key. Without it, the in-process mock
    /// gateway is used.
    #[arg(long, env = "PAYMENT_SECRET_KEY")]
    payment_secret_key: Option<String>,

    /// Currency for payment intents.
    #[arg(long, env = "BUSLANE_CURRENCY", default_value = "usd")]
    currency: String,

    /// Address for the Prometheus metrics exporter, e.g. 0.0.0.0:9100.
    #[arg(long, env = "BUSLANE_METRICS_ADDR")]
    metrics_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,buslane_server=debug")),
        )
        .init();

    if let Some(addr) = args.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!(%addr, "prometheus exporter listening");
    }

    let stores = Stores::in_memory();
    stores.open().await?;

    let payments: Arc<dyn PaymentGateway> = match args.payment_secret_key {
        Some(key) => Arc::new(StripeGateway::new(key)),
        None => {
            warn!("no payment secret configured; using the in-process mock gateway");
            Arc::new(MockGateway::new())
        }
    };

    let sequencer = Arc::new(BookingSequencer::new(
        Arc::clone(&stores.bookings),
        payments,
        Arc::new(LogMailer),
        Arc::new(InMemoryTicketVault::new()),
        args.currency,
    ));
    let queries = Arc::new(OperatorQueryEngine::new(stores.clone()));

    let config = NetworkConfig {
        host: args.host,
        port: args.port,
        cors_origins: args.cors_origins,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
    };

    let mut module = ServerModule::new(config, stores.clone(), sequencer, queries);
    module.start().await?;
    module
        .serve(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutdown signal received");
        })
        .await?;

    stores.close().await?;
    Ok(())
}
