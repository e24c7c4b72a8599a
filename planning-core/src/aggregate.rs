//! Read-time merge of remote and user-added events.

use crate::event::Event;
use crate::snapshot::PlanningSnapshot;

/// Combine the remote snapshot with the user's own events.
///
/// Remote events come first, in feed order, then local events in store order.
/// Nothing is de-duplicated or re-sorted; ids only need to be unique within
/// their own source.
pub fn aggregate(remote: &PlanningSnapshot, local: Option<&[Event]>) -> Vec<Event> {
    let local = local.unwrap_or_default();

    let mut events = Vec::with_capacity(remote.events.len() + local.len());
    events.extend_from_slice(&remote.events);
    events.extend_from_slice(local);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventSource, EventTime};

    fn event(id: &str, title: &str, start: &str, source: EventSource) -> Event {
        let start: EventTime = start.parse().unwrap();
        Event::new(id, title, start.clone(), start).with_source(source)
    }

    fn remote_snapshot() -> PlanningSnapshot {
        PlanningSnapshot::restored(
            vec![
                // Deliberately out of time order
                event("r1", "Physics", "2024-01-09T08:00+01:00", EventSource::Remote),
                event("r2", "Math", "2024-01-08T08:00+01:00", EventSource::Remote),
            ],
            None,
        )
    }

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_remote_events_precede_local_events() {
        let local = vec![event("l1", "Dentist", "2024-01-07T18:00+01:00", EventSource::Local)];

        let merged = aggregate(&remote_snapshot(), Some(&local));

        assert_eq!(ids(&merged), vec!["r1", "r2", "l1"]);
        assert_eq!(merged[2].source, EventSource::Local);
    }

    #[test]
    fn test_missing_local_set_is_empty() {
        let merged = aggregate(&remote_snapshot(), None);
        assert_eq!(ids(&merged), vec!["r1", "r2"]);
    }

    #[test]
    fn test_shared_ids_across_sources_are_kept() {
        let local = vec![event("r1", "My r1", "2024-01-09T12:00+01:00", EventSource::Local)];

        let merged = aggregate(&remote_snapshot(), Some(&local));

        assert_eq!(ids(&merged), vec!["r1", "r2", "r1"]);
        assert_eq!(merged[0].source, EventSource::Remote);
        assert_eq!(merged[2].source, EventSource::Local);
    }

    #[test]
    fn test_empty_inputs() {
        let merged = aggregate(&PlanningSnapshot::default(), Some(&[]));
        assert!(merged.is_empty());
    }
}
