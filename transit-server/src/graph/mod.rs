//! Static network graph and the searches over it.
//!
//! A [`StaticGraph`] is built once per query from the provider's
//! station-to-station links, then consumed by the spanning-tree extractor
//! and, through its dense [`WeightMatrix`] view, by shortest-path search.

mod dijkstra;
mod kruskal;
mod mapping;
mod static_graph;

pub use dijkstra::{ShortestPath, WeightMatrix};
pub use kruskal::{DisjointSet, minimum_spanning_tree, tree_endpoints};
pub use mapping::{IdMap, StationIndex};
pub use static_graph::{Edge, StaticGraph};
