//! Row types exchanged with the data provider.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{GtfsTime, StationId, StopId, TripId};

/// A stop with its display name and position.
///
/// Coordinates are carried for the presentation layer only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRow {
    pub stop_id: StopId,
    pub stop_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A stop as served by one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStop {
    pub stop_id: StopId,
    pub stop_sequence: u32,
    pub stop_name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A merged station and the raw stops it groups. The first stop is the
/// station's representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedStation {
    pub id: StationId,
    pub stop_ids: Vec<StopId>,
}

/// A weighted link between two merged stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEdgeRow {
    pub from: StationId,
    pub to: StationId,
    pub weight: u64,
}

/// One scheduled hop between consecutive stops of a trip, on a service date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRow {
    pub from_stop: StopId,
    pub to_stop: StopId,
    pub departure_time: GtfsTime,
    pub duration: Duration,
    pub trip_id: TripId,
}

/// A transfer rule between two stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRow {
    pub from_stop_id: StopId,
    pub to_stop_id: StopId,
    /// Seconds.
    pub min_transfer_time: u32,
}

impl TransferRow {
    pub fn duration(&self) -> Duration {
        Duration::seconds(i64::from(self.min_transfer_time))
    }
}

/// A scheduled trip with its ordered stop times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRow {
    pub trip_id: TripId,
    pub service_id: String,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub route_name: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
    pub stop_times: Vec<StopTimeRow>,
}

impl TripRow {
    pub fn details(&self) -> TripDetails {
        TripDetails {
            route_id: self.route_id.clone(),
            route_name: self.route_name.clone(),
            headsign: self.headsign.clone(),
        }
    }
}

/// Route and destination shown to a rider boarding a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    pub route_id: Option<String>,
    pub route_name: Option<String>,
    pub headsign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTimeRow {
    pub stop_id: StopId,
    pub arrival_time: GtfsTime,
    pub departure_time: GtfsTime,
}

/// The dates a service runs on, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRow {
    pub service_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CalendarRow {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
