//! The cached copy of the remote planning.

use chrono::{DateTime, Utc};

use crate::event::{Event, EventSource};

/// Every remote event known at one point in time.
///
/// A snapshot is never edited after construction: a refresh builds a new one
/// and swaps it in whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanningSnapshot {
    /// Remote events, in the order the feed returned them
    pub events: Vec<Event>,
    /// When the events were last fetched (None until the first fetch)
    pub last_updated: Option<DateTime<Utc>>,
}

impl PlanningSnapshot {
    /// Build a snapshot from a freshly fetched event list.
    pub fn fetched(events: Vec<Event>, at: DateTime<Utc>) -> Self {
        PlanningSnapshot {
            events: tag_remote(events),
            last_updated: Some(at),
        }
    }

    /// Build a snapshot from persisted values.
    pub fn restored(events: Vec<Event>, last_updated: Option<DateTime<Utc>>) -> Self {
        PlanningSnapshot {
            events: tag_remote(events),
            last_updated,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn tag_remote(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .map(|e| e.with_source(EventSource::Remote))
        .collect()
}
