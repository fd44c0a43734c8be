use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::config::ServerConfig;
use transit_server::provider::{DataProvider, JsonDataset};
use transit_server::web::{AppState, cors_layer, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Fail fast if the dataset is missing or malformed
    let dataset = JsonDataset::load(&config.dataset)?;
    info!(
        version = %dataset.version(),
        lines = dataset.line_names()?.len(),
        "dataset ready"
    );

    let state = AppState::new(dataset, &config.cache);
    let app = create_router(state).layer(cors_layer(&config.cors_origins)?);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "transit server listening");
    info!("endpoints: /health /acpm /acpm/points /dijkstra/:src/:dest /journey/:src/:dest/:start_time /lines /stops/:line /stop/:line/:stop_id");

    axum::serve(listener, app).await?;
    Ok(())
}
