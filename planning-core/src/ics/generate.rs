//! ICS generation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use super::{ID_PROPERTY, LOCAL_SOURCE, SOURCE_PROPERTY};
use crate::error::PlanningResult;
use crate::event::{Event, EventSource, EventTime};

const PRODID: &str = "-//planning//planning-core//FR";

/// Encode events as one VCALENDAR document, stamped with the current time.
pub fn encode(events: &[Event]) -> PlanningResult<String> {
    encode_at(events, Utc::now())
}

/// Encode events as one VCALENDAR document with an explicit DTSTAMP.
///
/// Every event must pass [`Event::validate`]; an empty list gives a valid
/// calendar with no VEVENT.
pub fn encode_at(events: &[Event], stamp: DateTime<Utc>) -> PlanningResult<String> {
    for event in events {
        event.validate()?;
    }

    let remote_ids: HashSet<&str> = events
        .iter()
        .filter(|e| e.source == EventSource::Remote)
        .map(|e| e.id.as_str())
        .collect();

    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    let mut cal = Calendar::new();
    for event in events {
        // A local event may reuse a remote id; UIDs must still be unique.
        let collides = event.is_local() && remote_ids.contains(event.id.as_str());
        cal.push(to_vevent(event, &dtstamp, collides));
    }
    let cal = cal.done();

    tracing::debug!(events = events.len(), "Encoded planning as ICS");
    Ok(strip_ics_bloat(&cal.to_string()))
}

fn to_vevent(event: &Event, dtstamp: &str, collides: bool) -> icalendar::Event {
    let mut vevent = icalendar::Event::new();

    if collides {
        vevent.uid(&format!("{}@local", event.id));
        vevent.add_property(ID_PROPERTY, &event.id);
    } else {
        vevent.uid(&event.id);
    }

    vevent.add_property("DTSTAMP", dtstamp);
    vevent.summary(&text(&event.title));
    add_datetime_property(&mut vevent, "DTSTART", &event.start);
    add_datetime_property(&mut vevent, "DTEND", &event.end);

    if let Some(ref location) = event.location {
        vevent.location(&text(location));
    }
    if let Some(ref description) = event.description {
        vevent.description(&text(description));
    }

    if event.is_local() {
        vevent.add_property(SOURCE_PROPERTY, LOCAL_SOURCE);
    }

    vevent.done()
}

fn add_datetime_property(vevent: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            vevent.append_property(prop);
        }
        EventTime::Zoned(dt) => {
            let utc = dt.with_timezone(&Utc);
            vevent.add_property(name, utc.format("%Y%m%dT%H%M%SZ").to_string());
        }
        EventTime::Floating(dt) => {
            vevent.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
        }
    }
}

/// icalendar escapes `\n` but leaves carriage returns alone.
fn text(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

/// Clean up the icalendar crate's output:
/// - our PRODID instead of the crate's
/// - no CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
