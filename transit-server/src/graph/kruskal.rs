//! Minimum spanning tree extraction (Kruskal).
//!
//! Edges are taken lightest-first and kept whenever they join two
//! components. On a disconnected graph the result is a spanning forest with
//! one tree per component, which is a valid answer rather than an error.

use tracing::debug;

use crate::domain::VertexId;

use super::static_graph::{Edge, StaticGraph};

/// Disjoint-set forest with union by rank and path halving.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`. Returns false if already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Compute a minimum spanning tree (or forest) of `graph`.
///
/// Ties between equal weights are broken by insertion order, so the output
/// is deterministic. Returns at most `n - 1` edges, in the order they were
/// accepted.
///
/// # Examples
///
/// ```
/// use transit_server::domain::VertexId;
/// use transit_server::graph::{StaticGraph, minimum_spanning_tree};
///
/// let mut g = StaticGraph::new(3);
/// g.add_edge(VertexId(0), VertexId(1), 1).unwrap();
/// g.add_edge(VertexId(1), VertexId(2), 2).unwrap();
/// g.add_edge(VertexId(0), VertexId(2), 3).unwrap();
///
/// let tree = minimum_spanning_tree(&g);
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.iter().map(|e| e.weight).sum::<u64>(), 3);
/// ```
pub fn minimum_spanning_tree(graph: &StaticGraph) -> Vec<Edge> {
    let n = graph.vertex_count();
    let target = n.saturating_sub(1);

    let mut edges: Vec<Edge> = graph.edges().to_vec();
    // Stable: equal weights keep insertion order
    edges.sort_by_key(|e| e.weight);

    let mut sets = DisjointSet::new(n);
    let mut tree = Vec::with_capacity(target);

    for edge in edges {
        if tree.len() == target {
            break;
        }
        if sets.union(edge.u.index(), edge.v.index()) {
            tree.push(edge);
        }
    }

    debug!(
        vertices = n,
        edges = graph.edges().len(),
        tree_edges = tree.len(),
        "spanning tree extracted"
    );

    tree
}

/// Endpoints of each tree edge, dropping weights.
pub fn tree_endpoints(tree: &[Edge]) -> Vec<(VertexId, VertexId)> {
    tree.iter().map(|e| (e.u, e.v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VertexId {
        VertexId(i)
    }

    fn graph(n: usize, edges: &[(usize, usize, u64)]) -> StaticGraph {
        let mut g = StaticGraph::new(n);
        for &(a, b, w) in edges {
            g.add_edge(v(a), v(b), w).unwrap();
        }
        g
    }

    fn total(tree: &[Edge]) -> u64 {
        tree.iter().map(|e| e.weight).sum()
    }

    #[test]
    fn disjoint_set_union_find() {
        let mut ds = DisjointSet::new(4);
        assert!(ds.union(0, 1));
        assert!(ds.union(2, 3));
        assert!(!ds.union(1, 0));
        assert_ne!(ds.find(0), ds.find(2));
        assert!(ds.union(1, 3));
        assert_eq!(ds.find(0), ds.find(2));
    }

    #[test]
    fn classic_example() {
        // Square with one diagonal
        let g = graph(
            4,
            &[(0, 1, 10), (0, 2, 6), (0, 3, 5), (1, 3, 15), (2, 3, 4)],
        );
        let tree = minimum_spanning_tree(&g);

        assert_eq!(
            tree_endpoints(&tree),
            vec![(v(2), v(3)), (v(0), v(3)), (v(0), v(1))]
        );
        assert_eq!(total(&tree), 19);
    }

    #[test]
    fn ties_follow_insertion_order() {
        let g = graph(3, &[(0, 1, 1), (1, 2, 1), (0, 2, 1)]);
        let tree = minimum_spanning_tree(&g);
        assert_eq!(tree_endpoints(&tree), vec![(v(0), v(1)), (v(1), v(2))]);

        let g = graph(3, &[(0, 2, 1), (1, 2, 1), (0, 1, 1)]);
        let tree = minimum_spanning_tree(&g);
        assert_eq!(tree_endpoints(&tree), vec![(v(0), v(2)), (v(1), v(2))]);
    }

    #[test]
    fn parallel_edges_pick_lightest() {
        let g = graph(2, &[(0, 1, 9), (1, 0, 2), (0, 1, 5)]);
        let tree = minimum_spanning_tree(&g);
        assert_eq!(tree, vec![Edge::new(v(1), v(0), 2)]);
    }

    #[test]
    fn self_loops_ignored() {
        let g = graph(2, &[(0, 0, 0), (1, 1, 0), (0, 1, 3)]);
        let tree = minimum_spanning_tree(&g);
        assert_eq!(tree, vec![Edge::new(v(0), v(1), 3)]);
    }

    #[test]
    fn disconnected_graph_gives_forest() {
        // Components {0,1,2} and {3,4}
        let g = graph(5, &[(0, 1, 1), (1, 2, 1), (0, 2, 1), (3, 4, 7)]);
        let tree = minimum_spanning_tree(&g);
        assert_eq!(tree.len(), (3 - 1) + (2 - 1));
    }

    #[test]
    fn isolated_vertices() {
        let tree = minimum_spanning_tree(&StaticGraph::new(4));
        assert!(tree.is_empty());
    }

    #[test]
    fn empty_and_single_vertex() {
        assert!(minimum_spanning_tree(&StaticGraph::new(0)).is_empty());
        assert!(minimum_spanning_tree(&StaticGraph::new(1)).is_empty());
    }

    #[test]
    fn repeated_runs_identical() {
        let g = graph(
            5,
            &[(0, 1, 2), (1, 2, 2), (2, 3, 2), (3, 4, 2), (4, 0, 2), (1, 3, 1)],
        );
        assert_eq!(minimum_spanning_tree(&g), minimum_spanning_tree(&g));
    }
}
