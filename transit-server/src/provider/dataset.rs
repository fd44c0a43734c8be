//! JSON-file backed data provider.
//!
//! The whole network lives in one JSON document loaded at startup. It is
//! immutable afterwards, so a single `JsonDataset` can be shared behind an
//! `Arc` by every request.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{StopId, TripId};

use super::DataProvider;
use super::error::ProviderError;
use super::rows::{
    CalendarRow, ConnectionRow, LineStop, MergedStation, StaticEdgeRow, StopRow, TransferRow,
    TripDetails, TripRow,
};

/// On-disk layout of a dataset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub stops: Vec<StopRow>,
    /// Stops served by each line, keyed by line name.
    #[serde(default)]
    pub lines: BTreeMap<String, Vec<LineStop>>,
    #[serde(default)]
    pub merged_stations: Vec<MergedStation>,
    /// Weighted links between merged stations.
    #[serde(default)]
    pub links: Vec<StaticEdgeRow>,
    #[serde(default)]
    pub trips: Vec<TripRow>,
    #[serde(default)]
    pub calendar: Vec<CalendarRow>,
    #[serde(default)]
    pub transfers: Vec<TransferRow>,
}

/// A read-only dataset loaded from JSON.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    file: DatasetFile,
    stop_names: HashMap<StopId, String>,
    calendar: HashMap<String, CalendarRow>,
    /// Position of each trip in `file.trips`
    trips: HashMap<TripId, usize>,
}

impl JsonDataset {
    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            version = %dataset.file.version,
            stops = dataset.file.stops.len(),
            trips = dataset.file.trips.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let file: DatasetFile = serde_json::from_str(json)?;
        Ok(Self::new(file))
    }

    pub fn new(mut file: DatasetFile) -> Self {
        for stops in file.lines.values_mut() {
            stops.sort_by_key(|s| s.stop_sequence);
        }

        let stop_names = file
            .stops
            .iter()
            .map(|s| (s.stop_id.clone(), s.stop_name.clone()))
            .collect();

        // Later entries for the same service override earlier ones
        let calendar = file
            .calendar
            .iter()
            .map(|c| (c.service_id.clone(), c.clone()))
            .collect();

        let mut trips = HashMap::with_capacity(file.trips.len());
        for (i, trip) in file.trips.iter().enumerate() {
            if trips.insert(trip.trip_id.clone(), i).is_some() {
                warn!(trip = %trip.trip_id, "duplicate trip id, keeping the last one");
            }
        }

        Self {
            file,
            stop_names,
            calendar,
            trips,
        }
    }

    fn runs_on(&self, trip: &TripRow, date: NaiveDate) -> bool {
        self.calendar
            .get(&trip.service_id)
            .is_some_and(|c| c.covers(date))
    }
}

impl DataProvider for JsonDataset {
    fn list_merged_stations(&self) -> Result<Vec<MergedStation>, ProviderError> {
        Ok(self.file.merged_stations.clone())
    }

    fn list_static_edges(&self) -> Result<Vec<StaticEdgeRow>, ProviderError> {
        Ok(self.file.links.clone())
    }

    fn count_stops(&self) -> Result<usize, ProviderError> {
        Ok(self.file.stops.len())
    }

    fn list_scheduled_connections(
        &self,
        service_date: NaiveDate,
    ) -> Result<Vec<ConnectionRow>, ProviderError> {
        let mut connections = Vec::new();
        let mut running = 0usize;

        for trip in self.file.trips.iter().filter(|t| self.runs_on(t, service_date)) {
            running += 1;
            for pair in trip.stop_times.windows(2) {
                let (here, next) = (&pair[0], &pair[1]);
                let Some(duration) = here.departure_time.until(next.arrival_time) else {
                    warn!(
                        trip = %trip.trip_id,
                        from = %here.stop_id,
                        to = %next.stop_id,
                        departure = %here.departure_time,
                        arrival = %next.arrival_time,
                        "skipping connection that arrives before it departs"
                    );
                    continue;
                };
                connections.push(ConnectionRow {
                    from_stop: here.stop_id.clone(),
                    to_stop: next.stop_id.clone(),
                    departure_time: here.departure_time,
                    duration,
                    trip_id: trip.trip_id.clone(),
                });
            }
        }

        debug!(
            %service_date,
            trips = running,
            connections = connections.len(),
            "listed scheduled connections"
        );
        Ok(connections)
    }

    fn list_transfers(&self) -> Result<Vec<TransferRow>, ProviderError> {
        Ok(self.file.transfers.clone())
    }

    fn lookup_stop_name(&self, stop_id: &StopId) -> Result<String, ProviderError> {
        self.stop_names
            .get(stop_id)
            .cloned()
            .ok_or_else(|| ProviderError::StopNotFound(stop_id.clone()))
    }

    fn list_stops(&self) -> Result<Vec<StopRow>, ProviderError> {
        Ok(self.file.stops.clone())
    }

    fn list_line_stops(&self, line: &str) -> Result<Vec<LineStop>, ProviderError> {
        self.file
            .lines
            .get(line)
            .cloned()
            .ok_or_else(|| ProviderError::LineNotFound(line.to_string()))
    }

    fn line_names(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.file.lines.keys().cloned().collect())
    }

    fn trip_details(&self, trip_id: &TripId) -> Result<TripDetails, ProviderError> {
        self.trips
            .get(trip_id)
            .map(|&i| self.file.trips[i].details())
            .ok_or_else(|| ProviderError::TripNotFound(trip_id.clone()))
    }

    fn version(&self) -> String {
        self.file.version.clone()
    }
}
