//! Domain types for the transit graph engine.
//!
//! This module contains the identifier and time types shared by the graph
//! builders, the searches and the data provider. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod error;
mod stop_id;
mod time;
mod trip_id;
mod vertex;

pub use error::GraphError;
pub use stop_id::{InvalidStopId, StopId};
pub use time::{GtfsTime, TIMESTAMP_FORMAT, TimeError, format_timestamp, parse_timestamp};
pub use trip_id::{InvalidTripId, TripId};
pub use vertex::{StationId, VertexId};
