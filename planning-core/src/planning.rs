//! The planning view: what a renderer talks to.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::aggregate::aggregate;
use crate::cache::{PlanningCache, SnapshotReceiver};
use crate::error::{PlanningError, PlanningResult};
use crate::event::Event;
use crate::export::{DEFAULT_EXPORT_FILENAME, ExportSink};
use crate::ics;
use crate::notify::Notifier;
use crate::refresh::RefreshCoordinator;
use crate::remote::RemoteSource;
use crate::snapshot::PlanningSnapshot;
use crate::store::{LocalSnapshotStore, SnapshotStore};

/// Cached, refreshable, exportable view of the user's planning.
pub struct Planning {
    cache: Arc<PlanningCache>,
    refresher: RefreshCoordinator,
    store: LocalSnapshotStore,
    export_filename: String,
}

impl Planning {
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = LocalSnapshotStore::new(store);
        let cache = Arc::new(PlanningCache::new(remote, store.clone()));
        let refresher = RefreshCoordinator::new(cache.clone(), notifier);

        Planning {
            cache,
            refresher,
            store,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }

    pub fn with_export_filename(mut self, filename: impl Into<String>) -> Self {
        self.export_filename = filename.into();
        self
    }

    /// Load the planning: from the local store when it has one, from the
    /// remote otherwise.
    pub async fn activate(&self) -> PlanningResult<Arc<PlanningSnapshot>> {
        let stored = self.store.snapshot().map_err(PlanningError::fetch)?;
        self.cache.resolve(stored).await
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    /// Remote events followed by the user's own events.
    ///
    /// Fails with [`PlanningError::NotLoaded`] until [`activate`](Self::activate)
    /// has resolved.
    pub fn events(&self) -> PlanningResult<Vec<Event>> {
        let snapshot = self.cache.current().ok_or(PlanningError::NotLoaded)?;
        let local = self.store.user_events()?;
        Ok(aggregate(&snapshot, local.as_deref()))
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.cache.current().and_then(|s| s.last_updated)
    }

    pub async fn refresh(&self) -> PlanningResult<Arc<PlanningSnapshot>> {
        self.refresher.refresh().await
    }

    pub async fn refresh_with_completion<F>(&self, complete: F) -> PlanningResult<Arc<PlanningSnapshot>>
    where
        F: FnOnce(),
    {
        self.refresher.refresh_with_completion(complete).await
    }

    /// Encode the current events as ICS text.
    pub fn calendar_text(&self) -> PlanningResult<String> {
        ics::encode(&self.events()?)
    }

    /// Encode the current events and hand them to `sink`.
    pub fn export_calendar(&self, sink: &dyn ExportSink) -> PlanningResult<PathBuf> {
        let text = self.calendar_text()?;
        sink.save(&self.export_filename, &text)
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.cache.subscribe()
    }

    /// Tear the view down. Fetches still in flight will not write anything.
    pub fn close(&self) {
        self.cache.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LogNotifier;
    use crate::store::{MemoryStore, PLANNING_KEY, USER_EVENTS_KEY};
    use crate::testing::{FakeRemote, event};

    fn planning(remote: &Arc<FakeRemote>, memory: &Arc<MemoryStore>) -> Planning {
        Planning::new(remote.clone(), memory.clone(), Arc::new(LogNotifier))
    }

    #[tokio::test]
    async fn test_events_unavailable_while_loading() {
        let planning = planning(&Arc::new(FakeRemote::new()), &Arc::new(MemoryStore::new()));

        assert!(planning.is_loading());
        assert!(matches!(planning.events(), Err(PlanningError::NotLoaded)));
        assert!(planning.last_updated().is_none());
    }

    #[tokio::test]
    async fn test_activate_merges_user_events() {
        let remote = Arc::new(FakeRemote::new());
        remote.push_ok(vec![event("a", "Math", "2024-01-08T08:00+01:00", "2024-01-08T10:00+01:00")]);
        let memory = Arc::new(MemoryStore::new());
        memory
            .set(
                USER_EVENTS_KEY,
                r#"[{"id":"u1","title":"Gym","start":"2024-01-08T18:00+01:00","end":"2024-01-08T19:00+01:00"}]"#,
            )
            .unwrap();
        let planning = planning(&remote, &memory);

        planning.activate().await.unwrap();
        let events = planning.events().unwrap();

        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Math", "Gym"]);
        assert!(events[1].is_local());
        assert!(planning.last_updated().is_some());
        assert!(memory.get(PLANNING_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_refresh_is_seen_by_next_read() {
        let remote = Arc::new(FakeRemote::new());
        remote.push_ok(vec![event("a", "Math", "2024-01-08T08:00+01:00", "2024-01-08T10:00+01:00")]);
        remote.push_ok(vec![event("b", "Physics", "2024-01-09T08:00+01:00", "2024-01-09T10:00+01:00")]);
        let planning = planning(&remote, &Arc::new(MemoryStore::new()));

        planning.activate().await.unwrap();
        planning.refresh().await.unwrap();

        let events = planning.events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "b");
    }

    #[tokio::test]
    async fn test_export_before_load_fails() {
        let planning = planning(&Arc::new(FakeRemote::new()), &Arc::new(MemoryStore::new()));
        assert!(matches!(planning.calendar_text(), Err(PlanningError::NotLoaded)));
    }
}
