// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Tracker API Server
//!
//! Serves the session API a map client uses to log workouts, keeping the
//! workout collection in a JSON key-value store between runs.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker::{
    config::Config,
    db::JsonFileStore,
    services::{ConfiguredLocation, LocationProvider},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Workout Tracker API");

    // Open the key-value store backing the workout collection
    let store = JsonFileStore::open(&config.store_path)?;
    if let Some(aside) = store.quarantined() {
        tracing::warn!(
            path = %store.path().display(),
            moved_to = %aside.display(),
            "Store file was unreadable and has been set aside"
        );
    }
    let state = Arc::new(AppState::new(config.clone(), Box::new(store)));

    {
        let mut session = state.session.lock().await;

        // Restore persisted workouts (list entries only)
        let report = session.start()?;
        if report.discarded_corrupt_store {
            tracing::warn!("Stored workouts were unreadable and have been discarded");
        }

        // Acquire a location for the map
        let location = ConfiguredLocation::from_config(&config);
        match location.current_location().await {
            Ok(center) => session.map_ready(center)?,
            Err(e) => session.location_unavailable(&e.to_string()),
        }

        // Startup rendering has no client to go to; clients fetch the list.
        let startup = state.render_queue.drain();
        tracing::debug!(commands = startup.len(), "Discarded startup render commands");
    }

    // Build router
    let app = workout_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("workout_tracker=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
