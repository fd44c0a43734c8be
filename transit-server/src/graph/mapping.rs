//! Identifier mapping between provider ids and dense vertices.

use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::{GraphError, StationId, StopId, VertexId};

/// Interner assigning dense vertex indices to external identifiers.
///
/// Indices are handed out in first-seen order, so two builds over the same
/// input sequence produce the same numbering.
#[derive(Debug, Clone)]
pub struct IdMap<K> {
    index: HashMap<K, VertexId>,
    keys: Vec<K>,
}

impl<K: Clone + Eq + Hash> IdMap<K> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Return the vertex for `key`, allocating the next index if unseen.
    pub fn intern(&mut self, key: &K) -> VertexId {
        if let Some(&v) = self.index.get(key) {
            return v;
        }
        let v = VertexId(self.keys.len());
        self.index.insert(key.clone(), v);
        self.keys.push(key.clone());
        v
    }

    /// Insert `key` only if it is new. Returns `None` for a duplicate.
    pub fn insert_new(&mut self, key: &K) -> Option<VertexId> {
        if self.index.contains_key(key) {
            return None;
        }
        Some(self.intern(key))
    }

    /// Look up the vertex for `key`.
    pub fn get(&self, key: &K) -> Option<VertexId> {
        self.index.get(key).copied()
    }

    /// Look up the key of a vertex.
    pub fn key(&self, v: VertexId) -> Option<&K> {
        self.keys.get(v.index())
    }

    /// Number of interned keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in vertex order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

impl<K: Clone + Eq + Hash> Default for IdMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from merged stations to vertices.
///
/// Each merged station becomes one vertex, numbered in the order the
/// provider listed them. The first stop of a station's list is its
/// representative, used to report results in stop vocabulary.
#[derive(Debug, Clone)]
pub struct StationIndex {
    stations: IdMap<StationId>,
    representatives: Vec<StopId>,
}

impl StationIndex {
    /// Build the mapping from `(station, stops)` pairs.
    ///
    /// Fails if a station is listed twice or has no stops.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{StationId, StopId, VertexId};
    /// use transit_server::graph::StationIndex;
    ///
    /// let chatelet = vec![StopId::new("1964").unwrap(), StopId::new("1965").unwrap()];
    /// let nation = vec![StopId::new("2200").unwrap()];
    /// let index = StationIndex::build([
    ///     (StationId(7), chatelet.as_slice()),
    ///     (StationId(3), nation.as_slice()),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(index.vertex(StationId(7)).unwrap(), VertexId(0));
    /// assert_eq!(index.representative(VertexId(0)).unwrap().as_str(), "1964");
    /// ```
    pub fn build<'a, I>(stations: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (StationId, &'a [StopId])>,
    {
        let stations = stations.into_iter();
        let (lower, _) = stations.size_hint();
        let mut ids = IdMap::with_capacity(lower);
        let mut representatives = Vec::with_capacity(lower);

        for (id, stops) in stations {
            let Some(first) = stops.first() else {
                return Err(GraphError::InvalidStation {
                    id: id.to_string(),
                    reason: "station has no stops",
                });
            };
            if ids.insert_new(&id).is_none() {
                return Err(GraphError::InvalidStation {
                    id: id.to_string(),
                    reason: "station listed more than once",
                });
            }
            representatives.push(first.clone());
        }

        Ok(Self {
            stations: ids,
            representatives,
        })
    }

    /// Number of vertices (merged stations).
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Vertex assigned to a station.
    pub fn vertex(&self, id: StationId) -> Result<VertexId, GraphError> {
        self.stations
            .get(&id)
            .ok_or_else(|| GraphError::station_not_found(id))
    }

    /// Station behind a vertex.
    pub fn station(&self, v: VertexId) -> Result<StationId, GraphError> {
        self.stations
            .key(v)
            .copied()
            .ok_or(GraphError::OutOfRange {
                index: v.index(),
                len: self.len(),
            })
    }

    /// Representative stop of a vertex.
    pub fn representative(&self, v: VertexId) -> Result<&StopId, GraphError> {
        self.representatives
            .get(v.index())
            .ok_or(GraphError::OutOfRange {
                index: v.index(),
                len: self.len(),
            })
    }
}
