mod config;
mod http;
mod logging;

use crate::{
    config::ServerConfig,
    http::{AppState, router},
    logging::{LogFormat, init_logging},
};
use signal_board::{Ingestor, SignalStore, SnapshotReader};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_logging(LogFormat::from_env());

    info!("Starting signal-board webhook server");

    let config = ServerConfig::from_env();
    let table = config.interval_table().inspect_err(|error| {
        error!(%error, "invalid interval table configuration");
    })?;
    info!(
        timeframes = ?table.timeframes(),
        "interval table loaded"
    );

    // Store is constructed once here and handed out as handles: Ingestor writes, reader reads
    let store = Arc::new(SignalStore::open(&config.data_file, table).inspect_err(|error| {
        error!(%error, "failed to open signal store");
    })?);

    let app = router(AppState {
        ingestor: Ingestor::new(Arc::clone(&store)),
        reader: SnapshotReader::new(Arc::clone(&store)),
    });

    let listener = TcpListener::bind(config.addr).await?;
    info!("Webhook endpoint listening on http://{}/webhook", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Final flush
    store.flush()?;
    info!(path = %store.path().display(), "signal store flushed, shutting down");

    Ok(())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(error) => {
            error!(%error, "failed to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}
