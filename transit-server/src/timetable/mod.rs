//! Timetable routing.
//!
//! A [`TimeExpandedNetwork`] holds the scheduled connections running on one
//! service date plus the always-available transfers. The [`Router`] answers
//! "leaving A no earlier than T, when can I be at B?" over it. This is
//! independent of the static station graph: it works on raw stops.

mod network;
mod router;

pub use network::{NetworkBuilder, ScheduledConnection, TimeExpandedNetwork, TransferEdge};
pub use router::{Hop, Itinerary, Router};
