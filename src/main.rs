// SPDX-License-Identifier: MIT

//! URG RideMaker bot process.
//!
//! Connects to the Discord gateway and Firestore, registers the interaction
//! handler, and exposes a liveness HTTP endpoint.

use std::sync::Arc;

use serenity::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ridemaker::{config::Config, db::RideStore, discord::Handler, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting URG RideMaker");

    // Initialize Firestore database
    let store = RideStore::new(&config.gcp_project_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to Firestore: {e}"))?;

    let state = Arc::new(AppState::new(config.clone(), store));

    // Liveness endpoint for the hosting platform
    let app = ridemaker::routes::create_router(state.clone());
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Liveness endpoint listening");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(error = %err, "Liveness server exited");
        }
    });

    // Discord gateway client
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(Handler::new(state))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {e}"))?;

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client failed: {e}"))?;

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ridemaker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
