//! Earliest-arrival search over a time-expanded network.
//!
//! Dijkstra keyed on arrival time. A scheduled connection out of a stop can
//! be taken only if it departs at or after the time we reached that stop;
//! a transfer can always be taken and adds its fixed duration. Because
//! waiting never makes an arrival earlier, the first time a stop is popped
//! its arrival time is final.
//!
//! Its predecessor is not. Zero-duration hops mean a stop popped later at
//! the same instant can still offer a better way in, so the search drains
//! every stop reached at the destination's arrival time before stopping,
//! and a settled stop may still switch predecessor as long as no cycle
//! forms. Equal-time pops go in stop ID order, never row order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::domain::{StopId, TripId, VertexId};

use super::network::TimeExpandedNetwork;

/// One step of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hop {
    /// Ride a scheduled connection.
    Ride {
        from: StopId,
        to: StopId,
        trip_id: TripId,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    },
    /// Walk or change platforms.
    Transfer {
        from: StopId,
        to: StopId,
        duration: Duration,
    },
}

impl Hop {
    /// Stop this hop ends at.
    pub fn to(&self) -> &StopId {
        match self {
            Hop::Ride { to, .. } | Hop::Transfer { to, .. } => to,
        }
    }

    /// Trip ridden, if this hop is a ride.
    pub fn trip_id(&self) -> Option<&TripId> {
        match self {
            Hop::Ride { trip_id, .. } => Some(trip_id),
            Hop::Transfer { .. } => None,
        }
    }
}

/// Earliest-arrival result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    /// Time the traveller was ready to leave.
    pub start_time: NaiveDateTime,
    /// Arrival at the destination.
    pub arrival_time: NaiveDateTime,
    /// `arrival_time - start_time`, including any initial wait.
    pub total_time: Duration,
    /// Stops from source to destination, no repeats.
    pub path: Vec<StopId>,
    /// How each consecutive pair in `path` was travelled.
    pub hops: Vec<Hop>,
}

impl Itinerary {
    /// Zero-length itinerary for a query whose source is its destination.
    fn stay(stop: &StopId, start_time: NaiveDateTime) -> Self {
        Self {
            start_time,
            arrival_time: start_time,
            total_time: Duration::zero(),
            path: vec![stop.clone()],
            hops: Vec::new(),
        }
    }

    /// Number of distinct trips ridden.
    pub fn trips(&self) -> usize {
        let mut last: Option<&TripId> = None;
        let mut count = 0;
        for trip in self.hops.iter().filter_map(Hop::trip_id) {
            if last != Some(trip) {
                count += 1;
            }
            last = Some(trip);
        }
        count
    }
}

/// How a stop was reached.
#[derive(Debug, Clone, Copy)]
enum Via {
    /// Index into `connections_from(from)`.
    Ride { from: usize, index: usize },
    /// Index into `transfers_from(from)`.
    Transfer { from: usize, index: usize },
}

impl Via {
    fn origin(self) -> usize {
        match self {
            Via::Ride { from, .. } | Via::Transfer { from, .. } => from,
        }
    }
}

/// Per-stop search state.
#[derive(Debug, Clone, Default)]
struct Label {
    arrival: Option<NaiveDateTime>,
    via: Option<Via>,
    finalized: bool,
}

/// Earliest-arrival search over one network.
pub struct Router<'a> {
    network: &'a TimeExpandedNetwork,
}

impl<'a> Router<'a> {
    pub fn new(network: &'a TimeExpandedNetwork) -> Self {
        Self { network }
    }

    /// Earliest arrival at `dest` leaving `src` no earlier than `start_time`.
    ///
    /// Returns `None` when `dest` cannot be reached. Stops that appear in no
    /// connection or transfer are unreachable unless `src == dest`.
    ///
    /// When two candidates reach a stop at the same instant, a scheduled
    /// connection is preferred over a transfer, and between two connections
    /// the one with the lower trip ID wins. The only exception is a
    /// candidate whose origin was itself reached through that stop, which
    /// would make the path loop.
    pub fn earliest_arrival(
        &self,
        src: &StopId,
        dest: &StopId,
        start_time: NaiveDateTime,
    ) -> Option<Itinerary> {
        if src == dest {
            return Some(Itinerary::stay(src, start_time));
        }

        let network = self.network;
        let source = network.stop_index(src)?;
        let target = network.stop_index(dest)?;
        let ids = network.stop_ids();

        let mut labels = vec![Label::default(); network.stop_count()];
        let mut frontier = BinaryHeap::new();
        let mut popped = 0usize;

        labels[source.index()].arrival = Some(start_time);
        frontier.push(Reverse((start_time, &ids[source.index()], source.index())));

        while let Some(Reverse((time, _, u))) = frontier.pop() {
            let done = &labels[target.index()];
            if done.finalized && done.arrival.is_some_and(|t| time > t) {
                break;
            }
            if labels[u].finalized {
                continue;
            }
            labels[u].finalized = true;
            popped += 1;

            for (index, conn) in network.connections_from(VertexId(u)).iter().enumerate() {
                if !conn.is_boardable_at(time) {
                    continue;
                }
                let v = conn.to.index();
                let via = Via::Ride { from: u, index };
                if self.relax(&mut labels, v, conn.arrival(), via) {
                    frontier.push(Reverse((conn.arrival(), &ids[v], v)));
                }
            }

            for (index, transfer) in network.transfers_from(VertexId(u)).iter().enumerate() {
                let v = transfer.to.index();
                let arrival = time + transfer.duration;
                let via = Via::Transfer { from: u, index };
                if self.relax(&mut labels, v, arrival, via) {
                    frontier.push(Reverse((arrival, &ids[v], v)));
                }
            }
        }

        let Some(arrival_time) = labels[target.index()].arrival else {
            debug!(src = %src, dest = %dest, popped, "no timetabled path");
            return None;
        };

        let hops = self.backtrack(&labels, source.index(), target.index())?;
        let mut path = Vec::with_capacity(hops.len() + 1);
        path.push(src.clone());
        path.extend(hops.iter().map(|h| h.to().clone()));

        debug!(
            src = %src,
            dest = %dest,
            popped,
            hops = hops.len(),
            arrival = %arrival_time,
            "earliest arrival found"
        );

        Some(Itinerary {
            start_time,
            arrival_time,
            total_time: arrival_time - start_time,
            path,
            hops,
        })
    }

    /// Offer `arrival` at stop `v` via `via`. Returns true if `v` must be
    /// (re)queued.
    fn relax(&self, labels: &mut [Label], v: usize, arrival: NaiveDateTime, via: Via) -> bool {
        match labels[v].arrival {
            Some(current) if arrival > current => false,
            Some(current) if arrival == current => {
                // Same instant: only the predecessor can change, the queue
                // entry already carries this time
                let label = &labels[v];
                if label.via.is_some_and(|old| self.preferred(via, old))
                    && !(label.finalized && descends_from(labels, via.origin(), v))
                {
                    labels[v].via = Some(via);
                }
                false
            }
            // Settled arrivals are minimal, nothing earlier can show up
            Some(_) if labels[v].finalized => false,
            _ => {
                labels[v].arrival = Some(arrival);
                labels[v].via = Some(via);
                true
            }
        }
    }

    /// Whether `new` beats `old` as the predecessor of an equal arrival.
    fn preferred(&self, new: Via, old: Via) -> bool {
        match (new, old) {
            (Via::Ride { .. }, Via::Transfer { .. }) => true,
            (Via::Ride { from: nf, index: ni }, Via::Ride { from: of, index: oi }) => {
                let new_trip = &self.network.connections_from(VertexId(nf))[ni].trip_id;
                let old_trip = &self.network.connections_from(VertexId(of))[oi].trip_id;
                new_trip < old_trip
            }
            (Via::Transfer { .. }, _) => false,
        }
    }

    /// Rebuild the hops from `source` to `target` by following predecessors.
    fn backtrack(&self, labels: &[Label], source: usize, target: usize) -> Option<Vec<Hop>> {
        let network = self.network;
        let stop = |i: usize| network.stop(VertexId(i)).cloned();

        let mut hops = Vec::new();
        let mut at = target;
        while at != source {
            let via = labels[at].via?;
            let hop = match via {
                Via::Ride { from, index } => {
                    let conn = &network.connections_from(VertexId(from))[index];
                    Hop::Ride {
                        from: stop(from)?,
                        to: stop(at)?,
                        trip_id: conn.trip_id.clone(),
                        departure: conn.departure,
                        arrival: conn.arrival(),
                    }
                }
                Via::Transfer { from, index } => Hop::Transfer {
                    from: stop(from)?,
                    to: stop(at)?,
                    duration: network.transfers_from(VertexId(from))[index].duration,
                },
            };
            hops.push(hop);
            at = via.origin();
        }
        hops.reverse();
        Some(hops)
    }
}

/// Whether following predecessors from `from` reaches `v`.
fn descends_from(labels: &[Label], from: usize, v: usize) -> bool {
    let mut at = from;
    loop {
        if at == v {
            return true;
        }
        match labels[at].via {
            Some(via) => at = via.origin(),
            None => return false,
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
