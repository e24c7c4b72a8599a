//! Local persistent key-value store.
//!
//! The planning view persists three values between runs: the last fetched
//! planning, the events the user added by hand, and the time of the last
//! successful fetch. Each is stored as JSON text under a fixed key.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::PlanningResult;
use crate::event::{Event, EventSource};
use crate::snapshot::PlanningSnapshot;

pub const PLANNING_KEY: &str = "planning";
pub const USER_EVENTS_KEY: &str = "userEvents";
pub const LAST_UPDATE_KEY: &str = "lastPlanningUpdate";

/// Raw key-value access. Reads return `None` for absent keys.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> PlanningResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PlanningResult<()>;
    fn remove(&self, key: &str) -> PlanningResult<()>;
}

/// Typed view over the three planning keys.
#[derive(Clone)]
pub struct LocalSnapshotStore {
    store: Arc<dyn SnapshotStore>,
}

impl LocalSnapshotStore {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        LocalSnapshotStore { store }
    }

    /// Load the persisted planning, if one was ever saved.
    ///
    /// A value that no longer parses is treated as absent, so the view falls
    /// back to fetching instead of getting stuck on a bad cache.
    pub fn snapshot(&self) -> PlanningResult<Option<PlanningSnapshot>> {
        let Some(raw) = self.store.get(PLANNING_KEY)? else {
            return Ok(None);
        };

        let events: Vec<Event> = match serde_json::from_str(&raw) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(key = PLANNING_KEY, error = %e, "Ignoring unreadable stored planning");
                return Ok(None);
            }
        };

        Ok(Some(PlanningSnapshot::restored(events, self.last_updated()?)))
    }

    /// Load the user-added events. The core never writes this key.
    pub fn user_events(&self) -> PlanningResult<Option<Vec<Event>>> {
        let Some(raw) = self.store.get(USER_EVENTS_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<Event>>(&raw) {
            Ok(events) => Ok(Some(
                events
                    .into_iter()
                    .map(|e| e.with_source(EventSource::Local))
                    .collect(),
            )),
            Err(e) => {
                tracing::warn!(key = USER_EVENTS_KEY, error = %e, "Ignoring unreadable user events");
                Ok(None)
            }
        }
    }

    pub fn last_updated(&self) -> PlanningResult<Option<DateTime<Utc>>> {
        let Some(raw) = self.store.get(LAST_UPDATE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<DateTime<Utc>>(&raw) {
            Ok(at) => Ok(Some(at)),
            Err(e) => {
                tracing::warn!(key = LAST_UPDATE_KEY, error = %e, "Ignoring unreadable refresh timestamp");
                Ok(None)
            }
        }
    }

    /// Persist a snapshot: planning first, then its timestamp.
    ///
    /// If the timestamp write fails the previous planning is put back, so the
    /// two keys never describe different fetches.
    pub fn save_snapshot(&self, snapshot: &PlanningSnapshot) -> PlanningResult<()> {
        let planning = serde_json::to_string(&snapshot.events)?;
        let last_updated = snapshot
            .last_updated
            .map(|at| serde_json::to_string(&at))
            .transpose()?;

        let previous = self.store.get(PLANNING_KEY)?;
        self.store.set(PLANNING_KEY, &planning)?;

        let stamped = match &last_updated {
            Some(value) => self.store.set(LAST_UPDATE_KEY, value),
            None => self.store.remove(LAST_UPDATE_KEY),
        };

        if let Err(e) = stamped {
            let restored = match &previous {
                Some(value) => self.store.set(PLANNING_KEY, value),
                None => self.store.remove(PLANNING_KEY),
            };
            if let Err(restore_err) = restored {
                tracing::error!(error = %restore_err, "Could not restore previous planning");
            }
            return Err(e);
        }

        Ok(())
    }
}
