//! ICS parsing using the icalendar crate's parser.

use icalendar::parser::{Component, read_calendar, unfold};
use icalendar::{CalendarDateTime, DatePerhapsTime};

use super::{ID_PROPERTY, LOCAL_SOURCE, SOURCE_PROPERTY};
use crate::error::{PlanningError, PlanningResult};
use crate::event::{Event, EventSource, EventTime};

/// Parse a VCALENDAR document back into events, in document order.
///
/// VEVENTs missing a UID or DTSTART are skipped.
pub fn decode(content: &str) -> PlanningResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| PlanningError::IcsParse(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| {
            let event = parse_vevent(vevent);
            if event.is_none() {
                tracing::warn!("Skipping VEVENT without UID or DTSTART");
            }
            event
        })
        .collect();

    Ok(events)
}

fn parse_vevent(vevent: &Component) -> Option<Event> {
    // TEXT values come back unescaped from the parser
    let uid = vevent.find_prop("UID")?.val.to_string();
    let id = vevent
        .find_prop(ID_PROPERTY)
        .map(|p| p.val.to_string())
        .unwrap_or(uid);

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let start = to_event_time(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    // RFC 5545: without DTEND the event ends when it starts
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .unwrap_or_else(|| start.clone());

    let source = match vevent.find_prop(SOURCE_PROPERTY) {
        Some(p) if p.val == LOCAL_SOURCE => EventSource::Local,
        _ => EventSource::Remote,
    };

    let mut event = Event::new(id, title, start, end).with_source(source);
    event.location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());
    event.description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

    Some(event)
}

/// TZID-qualified values are read as floating: we carry offsets, not a
/// timezone database.
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => EventTime::Zoned(dt.fixed_offset()),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(dt)) => EventTime::Floating(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => {
            EventTime::Floating(date_time)
        }
    }
}
