//! Data transfer objects for web responses.

use serde::Serialize;

use crate::domain::format_timestamp;
use crate::graph::ShortestPath;
use crate::provider::{DataProvider, ProviderError};
use crate::timetable::Itinerary;

/// Static shortest path between two merged-station vertices.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DijkstraResponse {
    /// Total weight, `null` when unreachable
    pub distance: Option<u64>,

    /// Vertices from source to destination, empty when unreachable
    pub path: Vec<usize>,
}

impl From<ShortestPath> for DijkstraResponse {
    fn from(sp: ShortestPath) -> Self {
        Self {
            distance: sp.distance,
            path: sp.path.into_iter().map(|v| v.index()).collect(),
        }
    }
}

/// A stop on a journey.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct JourneyStop {
    pub stop_id: String,
    pub stop_name: String,

    /// Trip ridden to reach this stop; absent for the origin and after a
    /// transfer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,

    /// Route of that trip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_headsign: Option<String>,
}

/// Earliest-arrival journey.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct JourneyResponse {
    /// Seconds from the requested start time to arrival
    pub total_time: i64,

    pub path: Vec<JourneyStop>,

    /// "YYYY-MM-DD HH:MM:SS"
    pub arrival_time: String,
}

impl JourneyResponse {
    /// Shape an itinerary, naming each stop and describing each trip from
    /// `provider`.
    pub fn from_itinerary<P>(itinerary: &Itinerary, provider: &P) -> Result<Self, ProviderError>
    where
        P: DataProvider + ?Sized,
    {
        let mut path = Vec::with_capacity(itinerary.path.len());
        for (i, stop) in itinerary.path.iter().enumerate() {
            let trip = i
                .checked_sub(1)
                .and_then(|h| itinerary.hops.get(h))
                .and_then(|hop| hop.trip_id());
            let details = trip
                .map(|t| provider.trip_details(t))
                .transpose()?
                .unwrap_or_default();
            path.push(JourneyStop {
                stop_id: stop.to_string(),
                stop_name: provider.lookup_stop_name(stop)?,
                trip_id: trip.map(|t| t.to_string()),
                route_id: details.route_id,
                route_name: details.route_name,
                trip_headsign: details.headsign,
            });
        }

        Ok(Self {
            total_time: itinerary.total_time.num_seconds(),
            path,
            arrival_time: format_timestamp(itinerary.arrival_time),
        })
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
