//! Graph error types.
//!
//! These are caller errors raised by graph construction and search: bad
//! indices, unknown identifiers, malformed station groupings. An unreachable
//! destination is a normal search outcome and is not represented here.

/// Errors raised by the graph engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A vertex index outside `[0, len)`
    #[error("vertex {index} out of range (graph has {len} vertices)")]
    OutOfRange { index: usize, len: usize },

    /// An identifier unknown to the lookup it was given to
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A merged station that cannot be mapped onto a vertex
    #[error("invalid station {id}: {reason}")]
    InvalidStation { id: String, reason: &'static str },
}

impl GraphError {
    /// Check that `index` addresses one of `len` vertices.
    pub fn check_range(index: usize, len: usize) -> Result<(), GraphError> {
        if index < len {
            Ok(())
        } else {
            Err(GraphError::OutOfRange { index, len })
        }
    }

    pub fn stop_not_found(id: impl ToString) -> Self {
        GraphError::NotFound {
            kind: "stop",
            id: id.to_string(),
        }
    }

    pub fn station_not_found(id: impl ToString) -> Self {
        GraphError::NotFound {
            kind: "station",
            id: id.to_string(),
        }
    }
}
