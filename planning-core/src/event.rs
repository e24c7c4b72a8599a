//! Planning event types.
//!
//! Events come from two places: the remote feed (the user's timetable) and the
//! local store (events the user added by hand). Both share one wire format;
//! the [`EventSource`] tag is only known in memory.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, PlanningResult};

/// A scheduled occurrence in the planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Where the event came from. Never part of the wire format.
    #[serde(skip)]
    pub source: EventSource,

    /// Wire fields we don't interpret (colours, class names, ...).
    /// Kept so that persisting a fetched planning writes them back unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Which namespace an event id belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// From the authoritative remote feed
    #[default]
    Remote,
    /// Added by the user on this device
    Local,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Event {
            id: id.into(),
            title: title.into(),
            start,
            end,
            location: None,
            description: None,
            source: EventSource::Remote,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_local(&self) -> bool {
        self.source == EventSource::Local
    }

    /// Check the contract every event must satisfy before export:
    /// a non-empty id and `end >= start`.
    pub fn validate(&self) -> PlanningResult<()> {
        if self.id.trim().is_empty() {
            return Err(PlanningError::Encode(format!(
                "event '{}' has an empty id",
                self.title
            )));
        }
        if self.end.to_utc() < self.start.to_utc() {
            return Err(PlanningError::Encode(format!(
                "event '{}' ends ({}) before it starts ({})",
                self.id, self.end, self.start
            )));
        }
        Ok(())
    }

    /// True if the event intersects `[from, to)`.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        let start = self.start.to_utc();
        let end = self.end.to_utc();
        start < to && (end > from || (end == start && start >= from))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A point in time as the feed gave it to us.
///
/// Serialized as an ISO 8601 string in the same shape it was read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventTime {
    /// Date-time carrying a UTC offset (`2024-01-08T08:00+01:00`)
    Zoned(DateTime<FixedOffset>),
    /// Date-time without offset (`2024-01-08T08:00:00`)
    Floating(NaiveDateTime),
    /// All-day value (`2024-01-08`)
    Date(NaiveDate),
}

const FLOATING_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

impl EventTime {
    /// Instant used for ordering and range checks.
    ///
    /// Floating and all-day values have no offset, so they are read as UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::Zoned(dt) => dt.with_timezone(&Utc),
            EventTime::Floating(dt) => dt.and_utc(),
            EventTime::Date(d) => d.and_time(NaiveTime::default()).and_utc(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Calendar date of this value, in its own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Zoned(dt) => dt.date_naive(),
            EventTime::Floating(dt) => dt.date(),
            EventTime::Date(d) => *d,
        }
    }
}

impl FromStr for EventTime {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(EventTime::Zoned(dt));
        }

        // RFC 3339 requires seconds; feeds often leave them out.
        let with_offset = match s.strip_suffix('Z') {
            Some(rest) => format!("{rest}+00:00"),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, "%Y-%m-%dT%H:%M%:z") {
            return Ok(EventTime::Zoned(dt));
        }

        for format in FLOATING_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(EventTime::Floating(dt));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(EventTime::Date)
            .map_err(|_| PlanningError::InvalidTime(s.to_string()))
    }
}

impl TryFrom<String> for EventTime {
    type Error = PlanningError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventTime> for String {
    fn from(time: EventTime) -> Self {
        time.to_string()
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventTime::Zoned(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            EventTime::Floating(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_offset_without_seconds() {
        let time: EventTime = "2024-01-08T08:00+01:00".parse().unwrap();
        let EventTime::Zoned(dt) = &time else {
            panic!("Expected Zoned, got {:?}", time);
        };
        assert_eq!(dt.offset().local_minus_utc(), 3600);
        assert_eq!(
            dt.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 8, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_zulu_without_seconds() {
        let time: EventTime = "2024-01-08T07:00Z".parse().unwrap();
        assert_eq!(time.to_utc(), Utc.with_ymd_and_hms(2024, 1, 8, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_floating_and_date() {
        let floating: EventTime = "2024-01-08T08:30:00".parse().unwrap();
        assert!(matches!(floating, EventTime::Floating(dt) if dt.minute() == 30));

        let date: EventTime = "2024-01-08".parse().unwrap();
        assert!(date.is_all_day());
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "next tuesday".parse::<EventTime>().unwrap_err();
        assert!(matches!(err, PlanningError::InvalidTime(_)));
    }

    #[test]
    fn test_wire_format_keeps_unknown_fields_and_skips_source() {
        let json = r##"{"id":"a","title":"Math","start":"2024-01-08T08:00+01:00","end":"2024-01-08T10:00+01:00","color":"#3f2a56"}"##;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.source, EventSource::Remote);
        assert_eq!(event.extra.get("color").and_then(|v| v.as_str()), Some("#3f2a56"));

        let written = serde_json::to_value(&event).unwrap();
        assert_eq!(written["color"], "#3f2a56");
        assert_eq!(written["start"], "2024-01-08T08:00:00+01:00");
        assert!(written.get("source").is_none(), "source must stay off the wire");
        assert!(written.get("location").is_none());
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let event = Event::new(
            "x",
            "Backwards",
            "2024-01-08T10:00+01:00".parse().unwrap(),
            "2024-01-08T08:00+01:00".parse().unwrap(),
        );
        assert!(matches!(event.validate(), Err(PlanningError::Encode(_))));
    }

    #[test]
    fn test_overlaps_range() {
        let event = Event::new(
            "a",
            "Math",
            "2024-01-08T08:00+01:00".parse().unwrap(),
            "2024-01-08T10:00+01:00".parse().unwrap(),
        );
        let day = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert!(event.overlaps(day, day + chrono::Duration::days(1)));
        assert!(!event.overlaps(day + chrono::Duration::days(1), day + chrono::Duration::days(2)));
    }
}
