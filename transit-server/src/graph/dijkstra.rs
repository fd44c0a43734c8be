//! Static shortest path over a dense weight matrix (Dijkstra).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::debug;

use crate::domain::{GraphError, VertexId};

/// Dense `n x n` weight matrix. `None` means "no edge", distinct from a
/// zero-weight edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMatrix {
    n: usize,
    weights: Vec<Option<u64>>,
}

/// Result of a static shortest-path query.
///
/// `distance` is `None` when the destination is unreachable, in which case
/// `path` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPath {
    pub distance: Option<u64>,
    pub path: Vec<VertexId>,
}

impl ShortestPath {
    pub fn unreachable() -> Self {
        Self {
            distance: None,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }
}

impl WeightMatrix {
    /// Create a matrix over `n` vertices with no edges.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            weights: vec![None; n * n],
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn slot(&self, u: VertexId, v: VertexId) -> Result<usize, GraphError> {
        GraphError::check_range(u.index(), self.n)?;
        GraphError::check_range(v.index(), self.n)?;
        Ok(u.index() * self.n + v.index())
    }

    /// Weight of the directed entry `u -> v`. Out-of-range pairs have no edge.
    pub fn get(&self, u: VertexId, v: VertexId) -> Option<u64> {
        self.slot(u, v).ok().and_then(|i| self.weights[i])
    }

    /// Set the directed entry `u -> v`.
    pub fn set(&mut self, u: VertexId, v: VertexId, weight: u64) -> Result<(), GraphError> {
        let i = self.slot(u, v)?;
        self.weights[i] = Some(weight);
        Ok(())
    }

    /// Set both `u -> v` and `v -> u`. Out-of-range pairs are ignored.
    pub(super) fn set_symmetric(&mut self, u: VertexId, v: VertexId, weight: u64) {
        let _ = self.set(u, v, weight);
        let _ = self.set(v, u, weight);
    }

    /// Outgoing edges of `u`, in vertex order.
    fn neighbours(&self, u: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.weights[u * self.n..(u + 1) * self.n]
            .iter()
            .enumerate()
            .filter_map(|(v, w)| w.map(|w| (v, w)))
    }

    /// Shortest path from `src` to `dest`.
    ///
    /// Both endpoints are range-checked before the search starts. Among
    /// equal-cost paths the first one discovered is kept, so repeated calls
    /// return the same path.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::VertexId;
    /// use transit_server::graph::StaticGraph;
    ///
    /// let mut g = StaticGraph::new(4);
    /// for (u, v, w) in [(0, 1, 4), (1, 2, 1), (0, 2, 10), (2, 3, 2)] {
    ///     g.add_edge(VertexId(u), VertexId(v), w).unwrap();
    /// }
    ///
    /// let result = g.weight_matrix().shortest_path(VertexId(0), VertexId(3)).unwrap();
    /// assert_eq!(result.distance, Some(7));
    /// assert_eq!(result.path, vec![VertexId(0), VertexId(1), VertexId(2), VertexId(3)]);
    /// ```
    pub fn shortest_path(&self, src: VertexId, dest: VertexId) -> Result<ShortestPath, GraphError> {
        GraphError::check_range(src.index(), self.n)?;
        GraphError::check_range(dest.index(), self.n)?;

        let (src, dest) = (src.index(), dest.index());
        let mut dist: Vec<Option<u64>> = vec![None; self.n];
        let mut prev: Vec<Option<usize>> = vec![None; self.n];
        let mut done = vec![false; self.n];
        let mut frontier = BinaryHeap::new();

        dist[src] = Some(0);
        frontier.push(Reverse((0u64, src)));

        while let Some(Reverse((d, u))) = frontier.pop() {
            if done[u] {
                continue;
            }
            done[u] = true;
            if u == dest {
                break;
            }

            for (v, w) in self.neighbours(u) {
                if done[v] {
                    continue;
                }
                let candidate = d.saturating_add(w);
                if dist[v].is_none_or(|current| candidate < current) {
                    dist[v] = Some(candidate);
                    prev[v] = Some(u);
                    frontier.push(Reverse((candidate, v)));
                }
            }
        }

        let Some(distance) = dist[dest] else {
            debug!(src, dest, "no static path");
            return Ok(ShortestPath::unreachable());
        };

        let mut path = vec![VertexId(dest)];
        let mut at = dest;
        while let Some(p) = prev[at] {
            path.push(VertexId(p));
            at = p;
        }
        path.reverse();

        Ok(ShortestPath {
            distance: Some(distance),
            path,
        })
    }
}
