//! Raw stop identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop ID: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// A raw stop identifier, as used by the timetable feed.
///
/// Stop IDs are opaque to the engine. The only validation is that they
/// are non-empty and carry no surrounding whitespace, so two IDs that look
/// the same in a response are the same stop.
///
/// # Examples
///
/// ```
/// use transit_server::domain::StopId;
///
/// let stop = StopId::new("IDFM:22092").unwrap();
/// assert_eq!(stop.as_str(), "IDFM:22092");
///
/// // Empty strings are rejected
/// assert!(StopId::new("").is_err());
///
/// // So is padding
/// assert!(StopId::new(" 22092").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Create a new stop ID.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidStopId> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidStopId {
                reason: "stop ID cannot be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidStopId {
                reason: "stop ID cannot have leading or trailing whitespace",
            });
        }
        Ok(StopId(s))
    }

    /// Returns the stop ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the StopId and returns the inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StopId::new(s)
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
