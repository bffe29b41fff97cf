use anyhow::{Context, Result};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use market_data_api::{AppState, config::Settings, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_data_api=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing market data API server...");

    // Load configuration
    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e); // Propagate the error
        }
    };
    // Wrap settings in Arc for shared ownership
    let shared_settings = Arc::new(settings);

    // Create the shared reqwest client used for every dataset fetch
    let http_client = Arc::new(
        Client::builder()
            .build()
            .context("Failed to build shared reqwest client")?,
    );
    tracing::info!("Shared HTTP client created.");

    let app_state = AppState {
        settings: shared_settings.clone(),
        http_client,
    };

    let app = routes::create_router(app_state);

    // Parse the server address from settings
    let addr: SocketAddr = shared_settings.server_address.parse().with_context(|| {
        format!(
            "Invalid server address format: {}",
            shared_settings.server_address
        )
    })?;

    // Create a TCP listener
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    // Run the server
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
