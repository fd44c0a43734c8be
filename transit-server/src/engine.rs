//! Query engine.
//!
//! Every query runs in two phases. The build phase pulls rows from the
//! provider and produces an immutable network. The query phase runs a pure
//! search over it. Built networks can be shared between queries (see
//! [`crate::cache`]) because nothing in the query phase mutates them.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{GraphError, StationId, StopId, VertexId};
use crate::graph::{
    Edge, ShortestPath, StaticGraph, StationIndex, WeightMatrix, minimum_spanning_tree,
};
use crate::provider::{DataProvider, MergedStation, ProviderError, StopRow};
use crate::timetable::{Itinerary, Router, TimeExpandedNetwork};

/// Errors from engine queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The merged-station graph together with its vertex mapping.
#[derive(Debug, Clone)]
pub struct StaticNetwork {
    pub index: StationIndex,
    pub graph: StaticGraph,
}

impl StaticNetwork {
    /// Dense view for shortest-path queries.
    pub fn weight_matrix(&self) -> WeightMatrix {
        self.graph.weight_matrix()
    }

    /// Minimum spanning forest in vertex form.
    pub fn mst_edges(&self) -> Vec<Edge> {
        minimum_spanning_tree(&self.graph)
    }

    /// Minimum spanning forest with each endpoint reported as its station's
    /// representative stop.
    pub fn mst(&self) -> Result<Vec<(StopId, StopId)>, GraphError> {
        self.mst_edges()
            .iter()
            .map(|e| {
                Ok((
                    self.index.representative(e.u)?.clone(),
                    self.index.representative(e.v)?.clone(),
                ))
            })
            .collect()
    }
}

/// A line stop that belongs to a merged station, with the stations before
/// and after it on the same line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStation {
    #[serde(rename = "id")]
    pub station: StationId,
    pub stop_ids: Vec<StopId>,
    pub line_stop_id: StopId,
    pub stop_name: String,
    pub lat: f64,
    pub lon: f64,
    pub stop_sequence: u32,
    pub line: String,
    /// `null` at the start of the line
    #[serde(rename = "prev_stop_id")]
    pub prev_station: Option<StationId>,
    /// `null` at the end of the line
    #[serde(rename = "next_stop_id")]
    pub next_station: Option<StationId>,
}

/// Build-then-query facade over a data provider.
pub struct Engine<P> {
    provider: P,
}

impl<P: DataProvider> Engine<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build the static graph over merged stations.
    pub fn build_static_network(&self) -> Result<StaticNetwork, QueryError> {
        let stations = self.provider.list_merged_stations()?;
        let index = StationIndex::build(stations.iter().map(|s| (s.id, s.stop_ids.as_slice())))?;

        let mut graph = StaticGraph::new(index.len());
        let links = self.provider.list_static_edges()?;
        for link in &links {
            let u = index.vertex(link.from)?;
            let v = index.vertex(link.to)?;
            graph.add_edge(u, v, link.weight)?;
        }

        debug!(
            vertices = index.len(),
            edges = graph.edges().len(),
            "built static network"
        );
        Ok(StaticNetwork { index, graph })
    }

    /// Build the time-expanded network for one service date.
    pub fn build_timetable(
        &self,
        service_date: NaiveDate,
    ) -> Result<TimeExpandedNetwork, QueryError> {
        let connections = self.provider.list_scheduled_connections(service_date)?;
        let transfers = self.provider.list_transfers()?;

        let mut builder = TimeExpandedNetwork::builder(self.provider.count_stops()?);
        for c in connections {
            builder.add_connection(
                &c.from_stop,
                &c.to_stop,
                c.departure_time.on(service_date),
                c.duration,
                c.trip_id,
            );
        }
        for t in &transfers {
            builder.add_transfer(&t.from_stop_id, &t.to_stop_id, t.duration());
        }
        Ok(builder.build())
    }

    /// Minimum spanning forest as pairs of representative stops.
    pub fn compute_mst(&self) -> Result<Vec<(StopId, StopId)>, QueryError> {
        Ok(self.build_static_network()?.mst()?)
    }

    /// Minimum spanning forest as vertex edges.
    pub fn mst_edges(&self) -> Result<Vec<Edge>, QueryError> {
        Ok(self.build_static_network()?.mst_edges())
    }

    /// Stops touched by the minimum spanning forest.
    pub fn compute_mst_points(&self) -> Result<Vec<StopRow>, QueryError> {
        let tree = self.compute_mst()?;
        self.mst_points(&tree)
    }

    /// Resolve MST endpoints to stop records, in first-appearance order.
    ///
    /// Endpoints the provider has no stop record for are left out.
    pub fn mst_points(&self, tree: &[(StopId, StopId)]) -> Result<Vec<StopRow>, QueryError> {
        let mut by_id: HashMap<StopId, StopRow> = self
            .provider
            .list_stops()?
            .into_iter()
            .map(|s| (s.stop_id.clone(), s))
            .collect();

        let mut seen = HashSet::new();
        let mut points = Vec::new();
        for stop in tree.iter().flat_map(|(a, b)| [a, b]) {
            if !seen.insert(stop) {
                continue;
            }
            match by_id.remove(stop) {
                Some(row) => points.push(row),
                None => warn!(stop = %stop, "spanning tree stop has no stop record"),
            }
        }
        Ok(points)
    }

    /// Every line's stops placed on their merged stations, line by line in
    /// sequence order.
    ///
    /// Line stops that belong to no merged station are left out, and
    /// neighbours are taken among the stops that remain. A stop listed in
    /// more than one station is placed on the first.
    pub fn compute_line_stations(&self) -> Result<Vec<LineStation>, QueryError> {
        let stations = self.provider.list_merged_stations()?;
        let mut owner: HashMap<&StopId, &MergedStation> = HashMap::new();
        for station in &stations {
            for stop in &station.stop_ids {
                owner.entry(stop).or_insert(station);
            }
        }

        let mut placed = Vec::new();
        for line in self.provider.line_names()? {
            let on_line: Vec<_> = self
                .provider
                .list_line_stops(&line)?
                .into_iter()
                .filter_map(|stop| match owner.get(&stop.stop_id) {
                    Some(&station) => Some((station, stop)),
                    None => {
                        debug!(%line, stop = %stop.stop_id, "line stop has no merged station");
                        None
                    }
                })
                .collect();

            for (i, (station, stop)) in on_line.iter().enumerate() {
                let neighbour = |j: Option<usize>| j.and_then(|j| on_line.get(j)).map(|(s, _)| s.id);
                placed.push(LineStation {
                    station: station.id,
                    stop_ids: station.stop_ids.clone(),
                    line_stop_id: stop.stop_id.clone(),
                    stop_name: stop.stop_name.clone(),
                    lat: stop.lat,
                    lon: stop.lon,
                    stop_sequence: stop.stop_sequence,
                    line: line.clone(),
                    prev_station: neighbour(i.checked_sub(1)),
                    next_station: neighbour(Some(i + 1)),
                });
            }
        }
        Ok(placed)
    }

    /// Shortest path between two merged-station vertices.
    pub fn compute_static_shortest_path(
        &self,
        src: VertexId,
        dest: VertexId,
    ) -> Result<ShortestPath, QueryError> {
        let network = self.build_static_network()?;
        Ok(network.weight_matrix().shortest_path(src, dest)?)
    }

    /// Earliest arrival at `dest` leaving `src` no earlier than `start_time`.
    ///
    /// The timetable is built for the calendar date of `start_time`.
    /// Returns `Ok(None)` when no itinerary exists.
    pub fn compute_earliest_arrival(
        &self,
        src: &StopId,
        dest: &StopId,
        start_time: NaiveDateTime,
    ) -> Result<Option<Itinerary>, QueryError> {
        self.check_stops(src, dest)?;
        let network = self.build_timetable(start_time.date())?;
        Ok(earliest_arrival(&network, src, dest, start_time))
    }

    /// Fail with `NotFound` unless the provider knows both stops.
    pub fn check_stops(&self, src: &StopId, dest: &StopId) -> Result<(), QueryError> {
        for stop in [src, dest] {
            match self.provider.lookup_stop_name(stop) {
                Ok(_) => {}
                Err(ProviderError::StopNotFound(id)) => {
                    return Err(GraphError::stop_not_found(id).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Query phase of [`Engine::compute_earliest_arrival`] over a built network.
pub fn earliest_arrival(
    network: &TimeExpandedNetwork,
    src: &StopId,
    dest: &StopId,
    start_time: NaiveDateTime,
) -> Option<Itinerary> {
    Router::new(network).earliest_arrival(src, dest, start_time)
}
