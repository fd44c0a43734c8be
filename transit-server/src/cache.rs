//! Cache of built networks.
//!
//! Building a network means pulling every row from the provider, so the web
//! layer keeps built networks around. Static networks are keyed by dataset
//! version; timetables by version and service date, which bounds cache
//! cardinality to the dates actually queried.
//!
//! Entries are immutable `Arc`s. A search only borrows the network, so one
//! cached network serves any number of concurrent queries.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;

use crate::engine::StaticNetwork;
use crate::timetable::TimeExpandedNetwork;

/// Cache key for timetables: (dataset version, service date).
type TimetableKey = (String, NaiveDate);

/// Configuration for the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 64,
        }
    }
}

/// Cache for built networks.
pub struct GraphCache {
    /// Static networks, keyed by dataset version.
    static_networks: MokaCache<String, Arc<StaticNetwork>>,

    /// Timetables, keyed by (version, service date).
    timetables: MokaCache<TimetableKey, Arc<TimeExpandedNetwork>>,
}

impl GraphCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let static_networks = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let timetables = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            static_networks,
            timetables,
        }
    }

    pub async fn get_static(&self, version: &str) -> Option<Arc<StaticNetwork>> {
        self.static_networks.get(version).await
    }

    pub async fn insert_static(&self, version: String, network: Arc<StaticNetwork>) {
        self.static_networks.insert(version, network).await;
    }

    pub async fn get_timetable(
        &self,
        version: &str,
        date: NaiveDate,
    ) -> Option<Arc<TimeExpandedNetwork>> {
        self.timetables.get(&(version.to_string(), date)).await
    }

    pub async fn insert_timetable(
        &self,
        version: String,
        date: NaiveDate,
        network: Arc<TimeExpandedNetwork>,
    ) {
        self.timetables.insert((version, date), network).await;
    }

    /// Get cache statistics (for monitoring).
    ///
    /// Counts are eventually consistent; pending inserts may not show yet.
    pub fn entry_count(&self) -> u64 {
        self.static_networks.entry_count() + self.timetables.entry_count()
    }

    /// Apply pending maintenance so that counts are up to date.
    pub async fn sync(&self) {
        self.static_networks.run_pending_tasks().await;
        self.timetables.run_pending_tasks().await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.static_networks.invalidate_all();
        self.timetables.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationId, StopId, TripId};
    use crate::graph::{StaticGraph, StationIndex};

    fn static_network() -> Arc<StaticNetwork> {
        let stops = vec![StopId::new("A").unwrap()];
        let index = StationIndex::build([(StationId(1), stops.as_slice())]).unwrap();
        Arc::new(StaticNetwork {
            index,
            graph: StaticGraph::new(1),
        })
    }

    fn timetable() -> Arc<TimeExpandedNetwork> {
        let mut builder = TimeExpandedNetwork::builder(2);
        builder.add_connection(
            &StopId::new("A").unwrap(),
            &StopId::new("B").unwrap(),
            date(10).and_hms_opt(8, 0, 0).unwrap(),
            chrono::Duration::minutes(10),
            TripId::new("T1").unwrap(),
        );
        Arc::new(builder.build())
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 64);
    }

    #[test]
    fn cache_creation() {
        let cache = GraphCache::new(&CacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn static_hit_and_miss() {
        let cache = GraphCache::new(&CacheConfig::default());
        assert!(cache.get_static("v1").await.is_none());

        let network = static_network();
        cache.insert_static("v1".into(), network.clone()).await;

        let hit = cache.get_static("v1").await.unwrap();
        assert!(Arc::ptr_eq(&hit, &network));
        assert!(cache.get_static("v2").await.is_none());
    }

    #[tokio::test]
    async fn timetables_keyed_by_date() {
        let cache = GraphCache::new(&CacheConfig::default());
        let network = timetable();
        cache
            .insert_timetable("v1".into(), date(10), network.clone())
            .await;

        let hit = cache.get_timetable("v1", date(10)).await.unwrap();
        assert!(Arc::ptr_eq(&hit, &network));
        assert_eq!(hit.connection_count(), 1);

        assert!(cache.get_timetable("v1", date(11)).await.is_none());
        assert!(cache.get_timetable("v2", date(10)).await.is_none());
    }

    #[tokio::test]
    async fn entry_count_and_invalidate() {
        let cache = GraphCache::new(&CacheConfig::default());
        cache.insert_static("v1".into(), static_network()).await;
        cache
            .insert_timetable("v1".into(), date(10), timetable())
            .await;
        cache.sync().await;
        assert_eq!(cache.entry_count(), 2);

        cache.invalidate_all();
        assert!(cache.get_static("v1").await.is_none());
        assert!(cache.get_timetable("v1", date(10)).await.is_none());
    }
}
