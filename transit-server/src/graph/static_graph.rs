//! Undirected weighted multigraph over dense vertices.

use serde::Serialize;

use crate::domain::{GraphError, VertexId};

use super::dijkstra::WeightMatrix;

/// An undirected edge with a non-negative weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub u: VertexId,
    pub v: VertexId,
    pub weight: u64,
}

impl Edge {
    pub fn new(u: VertexId, v: VertexId, weight: u64) -> Self {
        Self { u, v, weight }
    }

    pub fn is_self_loop(&self) -> bool {
        self.u == self.v
    }
}

/// Undirected graph over `n` vertices.
///
/// Edges are kept in insertion order. Parallel edges and self-loops are
/// stored as given; the consumers decide what they mean.
///
/// # Examples
///
/// ```
/// use transit_server::domain::VertexId;
/// use transit_server::graph::StaticGraph;
///
/// let mut g = StaticGraph::new(3);
/// g.add_edge(VertexId(0), VertexId(1), 4).unwrap();
/// g.add_edge(VertexId(1), VertexId(2), 1).unwrap();
/// assert_eq!(g.edges().len(), 2);
///
/// // Vertices must exist
/// assert!(g.add_edge(VertexId(0), VertexId(3), 1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StaticGraph {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl StaticGraph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Append an edge between `u` and `v`.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, weight: u64) -> Result<(), GraphError> {
        GraphError::check_range(u.index(), self.vertex_count)?;
        GraphError::check_range(v.index(), self.vertex_count)?;
        self.edges.push(Edge::new(u, v, weight));
        Ok(())
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Dense weight view for shortest-path search.
    ///
    /// Each edge is visible from both endpoints. Parallel edges collapse to
    /// the lightest one; self-loops are dropped.
    pub fn weight_matrix(&self) -> WeightMatrix {
        let mut matrix = WeightMatrix::new(self.vertex_count);
        for edge in self.edges.iter().filter(|e| !e.is_self_loop()) {
            let lighter = match matrix.get(edge.u, edge.v) {
                Some(existing) => existing.min(edge.weight),
                None => edge.weight,
            };
            // Endpoints were range-checked on insertion
            matrix.set_symmetric(edge.u, edge.v, lighter);
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VertexId {
        VertexId(i)
    }

    #[test]
    fn add_edge_keeps_insertion_order() {
        let mut g = StaticGraph::new(3);
        g.add_edge(v(2), v(0), 5).unwrap();
        g.add_edge(v(0), v(1), 3).unwrap();

        assert_eq!(
            g.edges(),
            &[Edge::new(v(2), v(0), 5), Edge::new(v(0), v(1), 3)]
        );
    }

    #[test]
    fn add_edge_rejects_out_of_range() {
        let mut g = StaticGraph::new(2);
        assert_eq!(
            g.add_edge(v(0), v(2), 1),
            Err(GraphError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            g.add_edge(v(5), v(0), 1),
            Err(GraphError::OutOfRange { index: 5, len: 2 })
        );
        assert!(g.edges().is_empty());
    }

    #[test]
    fn parallel_edges_and_self_loops_are_stored() {
        let mut g = StaticGraph::new(2);
        g.add_edge(v(0), v(1), 3).unwrap();
        g.add_edge(v(0), v(1), 1).unwrap();
        g.add_edge(v(1), v(1), 0).unwrap();
        assert_eq!(g.edges().len(), 3);
    }

    #[test]
    fn weight_matrix_is_symmetric() {
        let mut g = StaticGraph::new(3);
        g.add_edge(v(0), v(1), 4).unwrap();

        let m = g.weight_matrix();
        assert_eq!(m.get(v(0), v(1)), Some(4));
        assert_eq!(m.get(v(1), v(0)), Some(4));
        assert_eq!(m.get(v(0), v(2)), None);
    }

    #[test]
    fn weight_matrix_keeps_lightest_parallel_edge() {
        let mut g = StaticGraph::new(2);
        g.add_edge(v(0), v(1), 7).unwrap();
        g.add_edge(v(1), v(0), 2).unwrap();
        g.add_edge(v(0), v(1), 9).unwrap();

        let m = g.weight_matrix();
        assert_eq!(m.get(v(0), v(1)), Some(2));
        assert_eq!(m.get(v(1), v(0)), Some(2));
    }

    #[test]
    fn weight_matrix_distinguishes_zero_from_absent() {
        let mut g = StaticGraph::new(3);
        g.add_edge(v(0), v(1), 0).unwrap();

        let m = g.weight_matrix();
        assert_eq!(m.get(v(0), v(1)), Some(0));
        assert_eq!(m.get(v(1), v(2)), None);
    }

    #[test]
    fn weight_matrix_drops_self_loops() {
        let mut g = StaticGraph::new(1);
        g.add_edge(v(0), v(0), 3).unwrap();
        assert_eq!(g.weight_matrix().get(v(0), v(0)), None);
    }
}
