//! Timetable time handling.
//!
//! Timetables give stop times as "HH:MM:SS" measured from midnight of the
//! service day. Hours may go past 23 for trips that run after midnight, so a
//! stop time only becomes an instant once it is placed on a service date.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Format used for timestamps on the wire ("2024-05-10 08:30:00").
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A stop time relative to the start of its service day.
///
/// # Examples
///
/// ```
/// use transit_server::domain::GtfsTime;
/// use chrono::NaiveDate;
///
/// let t = GtfsTime::parse("25:10:00").unwrap();
/// assert_eq!(t.to_string(), "25:10:00");
///
/// // Placed on a service date, it lands on the following calendar day
/// let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
/// assert_eq!(t.on(date).to_string(), "2024-05-11 01:10:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GtfsTime(u32);

impl GtfsTime {
    /// Create a time from seconds after midnight of the service day.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Parse a time in "H:MM:SS" or "HH:MM:SS" format.
    ///
    /// Hours may exceed 23, minutes and seconds may not exceed 59.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::GtfsTime;
    ///
    /// assert!(GtfsTime::parse("08:00:00").is_ok());
    /// assert!(GtfsTime::parse("8:00:00").is_ok());
    /// assert!(GtfsTime::parse("47:59:59").is_ok());
    ///
    /// assert!(GtfsTime::parse("08:00").is_err());
    /// assert!(GtfsTime::parse("08:60:00").is_err());
    /// assert!(GtfsTime::parse("0800:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new("expected HH:MM:SS format"));
        };

        if h.is_empty() || h.len() > 2 {
            return Err(TimeError::new("hour must have 1 or 2 digits"));
        }
        let hour = parse_digits(h).ok_or_else(|| TimeError::new("invalid hour digits"))?;

        if m.len() != 2 {
            return Err(TimeError::new("minute must have 2 digits"));
        }
        let minute = parse_digits(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        if sec.len() != 2 {
            return Err(TimeError::new("second must have 2 digits"));
        }
        let second = parse_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Seconds after midnight of the service day.
    pub fn as_seconds(self) -> u32 {
        self.0
    }

    /// Place this time on a service date.
    pub fn on(self, service_date: NaiveDate) -> NaiveDateTime {
        service_date.and_time(chrono::NaiveTime::MIN) + Duration::seconds(i64::from(self.0))
    }

    /// Duration from `self` until `later`, or `None` if `later` is earlier.
    pub fn until(self, later: GtfsTime) -> Option<Duration> {
        later
            .0
            .checked_sub(self.0)
            .map(|secs| Duration::seconds(i64::from(secs)))
    }
}

impl fmt::Display for GtfsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0 / 3600,
            (self.0 / 60) % 60,
            self.0 % 60
        )
    }
}

impl TryFrom<String> for GtfsTime {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        GtfsTime::parse(&s)
    }
}

impl From<GtfsTime> for String {
    fn from(t: GtfsTime) -> Self {
        t.to_string()
    }
}

/// Parse a "YYYY-MM-DD HH:MM:SS" timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| TimeError::new("expected YYYY-MM-DD HH:MM:SS format"))
}

/// Format a timestamp as "YYYY-MM-DD HH:MM:SS".
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a run of ASCII digits into a u32.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
