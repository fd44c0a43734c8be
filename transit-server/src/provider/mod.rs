//! Data provider.
//!
//! The graph core never touches storage. Everything it needs arrives through
//! the [`DataProvider`] trait as plain rows: merged stations and their links
//! for the static graph, dated connections and transfers for the timetable.

mod dataset;
mod error;
mod rows;

use chrono::NaiveDate;

use crate::domain::{StopId, TripId};

pub use dataset::{DatasetFile, JsonDataset};
pub use error::ProviderError;
pub use rows::{
    CalendarRow, ConnectionRow, LineStop, MergedStation, StaticEdgeRow, StopRow, StopTimeRow,
    TransferRow, TripDetails, TripRow,
};

/// Read-only source of network data.
pub trait DataProvider {
    /// Merged stations in vertex order.
    fn list_merged_stations(&self) -> Result<Vec<MergedStation>, ProviderError>;

    /// Links between merged stations.
    fn list_static_edges(&self) -> Result<Vec<StaticEdgeRow>, ProviderError>;

    /// Number of raw stops.
    fn count_stops(&self) -> Result<usize, ProviderError>;

    /// Connections of every trip running on `service_date`.
    fn list_scheduled_connections(
        &self,
        service_date: NaiveDate,
    ) -> Result<Vec<ConnectionRow>, ProviderError>;

    fn list_transfers(&self) -> Result<Vec<TransferRow>, ProviderError>;

    /// Display name of a stop, [`ProviderError::StopNotFound`] if unknown.
    fn lookup_stop_name(&self, stop_id: &StopId) -> Result<String, ProviderError>;

    fn list_stops(&self) -> Result<Vec<StopRow>, ProviderError>;

    /// Stops of a line ordered by sequence.
    fn list_line_stops(&self, line: &str) -> Result<Vec<LineStop>, ProviderError>;

    fn line_names(&self) -> Result<Vec<String>, ProviderError>;

    /// Route and headsign of a trip, [`ProviderError::TripNotFound`] if
    /// unknown.
    fn trip_details(&self, trip_id: &TripId) -> Result<TripDetails, ProviderError>;

    /// Identifies the data currently served. Built graphs are cached per
    /// version.
    fn version(&self) -> String;
}

impl<P: DataProvider + ?Sized> DataProvider for std::sync::Arc<P> {
    fn list_merged_stations(&self) -> Result<Vec<MergedStation>, ProviderError> {
        (**self).list_merged_stations()
    }

    fn list_static_edges(&self) -> Result<Vec<StaticEdgeRow>, ProviderError> {
        (**self).list_static_edges()
    }

    fn count_stops(&self) -> Result<usize, ProviderError> {
        (**self).count_stops()
    }

    fn list_scheduled_connections(
        &self,
        service_date: NaiveDate,
    ) -> Result<Vec<ConnectionRow>, ProviderError> {
        (**self).list_scheduled_connections(service_date)
    }

    fn list_transfers(&self) -> Result<Vec<TransferRow>, ProviderError> {
        (**self).list_transfers()
    }

    fn lookup_stop_name(&self, stop_id: &StopId) -> Result<String, ProviderError> {
        (**self).lookup_stop_name(stop_id)
    }

    fn list_stops(&self) -> Result<Vec<StopRow>, ProviderError> {
        (**self).list_stops()
    }

    fn list_line_stops(&self, line: &str) -> Result<Vec<LineStop>, ProviderError> {
        (**self).list_line_stops(line)
    }

    fn line_names(&self) -> Result<Vec<String>, ProviderError> {
        (**self).line_names()
    }

    fn trip_details(&self, trip_id: &TripId) -> Result<TripDetails, ProviderError> {
        (**self).trip_details(trip_id)
    }

    fn version(&self) -> String {
        (**self).version()
    }
}
