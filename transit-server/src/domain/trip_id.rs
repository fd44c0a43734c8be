//! Trip identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid trip identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trip ID: {reason}")]
pub struct InvalidTripId {
    reason: &'static str,
}

/// Identifier of one scheduled trip (one vehicle run along a route).
///
/// Trip IDs order lexicographically; the router relies on that ordering to
/// pick between connections that reach a stop at the same instant.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripId(String);

impl TripId {
    /// Create a new trip ID. Returns an error if the string is empty.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidTripId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidTripId {
                reason: "trip ID cannot be empty",
            });
        }
        Ok(TripId(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TripId {
    type Error = InvalidTripId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TripId::new(s)
    }
}

impl From<TripId> for String {
    fn from(id: TripId) -> Self {
        id.0
    }
}

impl fmt::Debug for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TripId({})", self.0)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_empty() {
        assert!(TripId::new("").is_err());
        assert!(TripId::new("T1").is_ok());
    }

    #[test]
    fn display() {
        let trip = TripId::new("RER-A-0812").unwrap();
        assert_eq!(trip.to_string(), "RER-A-0812");
        assert_eq!(format!("{:?}", trip), "TripId(RER-A-0812)");
    }

    #[test]
    fn ordering() {
        let t1 = TripId::new("T1").unwrap();
        let t2 = TripId::new("T2").unwrap();
        assert!(t1 < t2);
    }
}
