//! Dense vertex and station identifiers.

use serde::{Deserialize, Serialize};

/// Index of a vertex in a graph built for one query.
///
/// Vertices are dense: a graph over `n` vertices uses exactly `0..n`.
/// They carry no meaning outside the graph that allocated them, so never
/// compare `VertexId`s from two different builds.
///
/// # Examples
///
/// ```
/// use transit_server::domain::VertexId;
///
/// let v = VertexId(3);
/// assert_eq!(v.index(), 3);
/// assert_eq!(v.to_string(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub usize);

impl VertexId {
    /// Returns the index as a `usize`, for slice indexing.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a merged station, as assigned by the data provider.
///
/// A merged station groups the platforms of one interchange. The provider
/// owns the grouping and the numbering; the engine maps these ids onto
/// dense [`VertexId`]s per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
