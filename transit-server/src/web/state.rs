//! Application state for the web layer.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::cache::{CacheConfig, GraphCache};
use crate::engine::{Engine, StaticNetwork};
use crate::provider::{DataProvider, JsonDataset};
use crate::timetable::TimeExpandedNetwork;

use super::routes::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Query engine over the loaded dataset
    pub engine: Arc<Engine<JsonDataset>>,

    /// Built networks, per dataset version
    pub cache: Arc<GraphCache>,
}

impl AppState {
    pub fn new(dataset: JsonDataset, cache_config: &CacheConfig) -> Self {
        Self {
            engine: Arc::new(Engine::new(dataset)),
            cache: Arc::new(GraphCache::new(cache_config)),
        }
    }

    fn version(&self) -> String {
        self.engine.provider().version()
    }

    /// The static network, built on the blocking pool on a cache miss.
    pub async fn static_network(&self) -> Result<Arc<StaticNetwork>, AppError> {
        let version = self.version();
        if let Some(cached) = self.cache.get_static(&version).await {
            return Ok(cached);
        }

        let engine = self.engine.clone();
        let network = Arc::new(blocking(move || engine.build_static_network()).await?);
        debug!(%version, "cached static network");
        self.cache.insert_static(version, network.clone()).await;
        Ok(network)
    }

    /// The timetable for a service date, built on the blocking pool on a
    /// cache miss.
    pub async fn timetable(&self, date: NaiveDate) -> Result<Arc<TimeExpandedNetwork>, AppError> {
        let version = self.version();
        if let Some(cached) = self.cache.get_timetable(&version, date).await {
            return Ok(cached);
        }

        let engine = self.engine.clone();
        let network = Arc::new(blocking(move || engine.build_timetable(date)).await?);
        debug!(%version, %date, connections = network.connection_count(), "cached timetable");
        self.cache
            .insert_timetable(version, date, network.clone())
            .await;
        Ok(network)
    }
}

/// Run synchronous graph work on the blocking pool.
pub async fn blocking<T, E, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("worker task failed: {e}"),
        })?
        .map_err(Into::into)
}
