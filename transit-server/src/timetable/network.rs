//! Time-expanded network: scheduled connections and transfers between stops.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::domain::{StopId, TripId, VertexId};
use crate::graph::IdMap;

/// One scheduled trip segment between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledConnection {
    pub from: VertexId,
    pub to: VertexId,
    pub departure: NaiveDateTime,
    pub duration: Duration,
    pub trip_id: TripId,
}

impl ScheduledConnection {
    /// Arrival instant at `to`.
    pub fn arrival(&self) -> NaiveDateTime {
        self.departure + self.duration
    }

    /// Whether a traveller at `from` at time `at` can still board.
    pub fn is_boardable_at(&self, at: NaiveDateTime) -> bool {
        self.departure >= at
    }
}

/// A walking or interchange link, usable at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEdge {
    pub from: VertexId,
    pub to: VertexId,
    pub duration: Duration,
}

/// Connections and transfers over interned stops, built for one service
/// date and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TimeExpandedNetwork {
    stops: IdMap<StopId>,
    connections: Vec<Vec<ScheduledConnection>>,
    transfers: Vec<Vec<TransferEdge>>,
}

impl TimeExpandedNetwork {
    /// Start building a network. `stop_count` is a capacity hint.
    pub fn builder(stop_count: usize) -> NetworkBuilder {
        NetworkBuilder {
            stops: IdMap::with_capacity(stop_count),
            connections: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// Vertex of a stop, if the stop appears in any connection or transfer.
    pub fn stop_index(&self, stop: &StopId) -> Option<VertexId> {
        self.stops.get(stop)
    }

    /// Stop behind a vertex.
    pub fn stop(&self, v: VertexId) -> Option<&StopId> {
        self.stops.key(v)
    }

    /// All stops, indexed by vertex.
    pub fn stop_ids(&self) -> &[StopId] {
        self.stops.keys()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.iter().map(Vec::len).sum()
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.iter().map(Vec::len).sum()
    }

    /// Scheduled connections leaving `v`, by departure time.
    pub fn connections_from(&self, v: VertexId) -> &[ScheduledConnection] {
        self.connections.get(v.index()).map(Vec::as_slice).unwrap_or_default()
    }

    /// Transfers leaving `v`, in insertion order.
    pub fn transfers_from(&self, v: VertexId) -> &[TransferEdge] {
        self.transfers.get(v.index()).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Builder collecting rows before the network is frozen.
#[derive(Debug)]
pub struct NetworkBuilder {
    stops: IdMap<StopId>,
    connections: Vec<ScheduledConnection>,
    transfers: Vec<TransferEdge>,
}

impl NetworkBuilder {
    /// Add a scheduled connection. Negative durations are dropped.
    pub fn add_connection(
        &mut self,
        from: &StopId,
        to: &StopId,
        departure: NaiveDateTime,
        duration: Duration,
        trip_id: TripId,
    ) -> &mut Self {
        if duration < Duration::zero() {
            warn!(
                from = %from,
                to = %to,
                trip = %trip_id,
                "dropping connection with negative duration"
            );
            return self;
        }
        let from = self.stops.intern(from);
        let to = self.stops.intern(to);
        self.connections.push(ScheduledConnection {
            from,
            to,
            departure,
            duration,
            trip_id,
        });
        self
    }

    /// Add a transfer usable in both directions. Negative durations are
    /// dropped.
    pub fn add_transfer(&mut self, a: &StopId, b: &StopId, duration: Duration) -> &mut Self {
        if duration < Duration::zero() {
            warn!(from = %a, to = %b, "dropping transfer with negative duration");
            return self;
        }
        let a = self.stops.intern(a);
        let b = self.stops.intern(b);
        self.transfers.push(TransferEdge {
            from: a,
            to: b,
            duration,
        });
        if a != b {
            self.transfers.push(TransferEdge {
                from: b,
                to: a,
                duration,
            });
        }
        self
    }

    /// Freeze the network.
    pub fn build(self) -> TimeExpandedNetwork {
        let n = self.stops.len();
        let mut connections: Vec<Vec<ScheduledConnection>> = vec![Vec::new(); n];
        let mut transfers: Vec<Vec<TransferEdge>> = vec![Vec::new(); n];

        for c in self.connections {
            connections[c.from.index()].push(c);
        }
        for list in &mut connections {
            // Stable, so equal departures keep insertion order
            list.sort_by_key(|c| c.departure);
        }
        for t in self.transfers {
            transfers[t.from.index()].push(t);
        }

        let network = TimeExpandedNetwork {
            stops: self.stops,
            connections,
            transfers,
        };
        debug!(
            stops = network.stop_count(),
            connections = network.connection_count(),
            transfers = network.transfer_count(),
            "time-expanded network built"
        );
        network
    }
}
