//! In-process cache of the planning snapshot.
//!
//! The cache holds at most one [`PlanningSnapshot`] behind an `Arc`. Writers
//! never touch a published snapshot; they build a new one, persist it, then
//! swap the pointer. Readers therefore always see a complete snapshot, and
//! subscribers are woken on every swap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard, watch};

use crate::error::{PlanningError, PlanningResult};
use crate::event::Event;
use crate::remote::RemoteSource;
use crate::snapshot::PlanningSnapshot;
use crate::store::LocalSnapshotStore;

/// Cache key of the planning query.
pub const PLANNING_CACHE_KEY: &str = "planning";

pub type SnapshotReceiver = watch::Receiver<Option<Arc<PlanningSnapshot>>>;

pub struct PlanningCache {
    remote: Arc<dyn RemoteSource>,
    store: LocalSnapshotStore,
    current: watch::Sender<Option<Arc<PlanningSnapshot>>>,
    /// Held for the whole duration of any fetch that will write the snapshot.
    inflight: Mutex<()>,
    closed: AtomicBool,
}

impl PlanningCache {
    pub fn new(remote: Arc<dyn RemoteSource>, store: LocalSnapshotStore) -> Self {
        let (current, _) = watch::channel(None);
        PlanningCache {
            remote,
            store,
            current,
            inflight: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &LocalSnapshotStore {
        &self.store
    }

    /// The published snapshot, if the cache has resolved.
    pub fn current(&self) -> Option<Arc<PlanningSnapshot>> {
        self.current.borrow().clone()
    }

    /// True until the first snapshot is published.
    pub fn is_loading(&self) -> bool {
        self.current.borrow().is_none()
    }

    /// Watch for snapshot replacements.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.current.subscribe()
    }

    /// Seed-or-fetch.
    ///
    /// - already resolved: the published snapshot, untouched
    /// - `stored` given: published as is, no network access
    /// - otherwise: one remote fetch, persisted and published
    ///
    /// A failed fetch is returned as [`PlanningError::Fetch`]; nothing is
    /// published in that case.
    pub async fn resolve(
        &self,
        stored: Option<PlanningSnapshot>,
    ) -> PlanningResult<Arc<PlanningSnapshot>> {
        if let Some(current) = self.current() {
            return Ok(current);
        }
        self.ensure_open()?;

        if let Some(stored) = stored {
            return Ok(self.seed(stored));
        }

        let _inflight = self.inflight.lock().await;
        // Someone else may have published while we waited for the gate
        if let Some(current) = self.current() {
            return Ok(current);
        }

        tracing::info!("No stored planning, fetching from remote");
        let events = self.fetch().await.map_err(PlanningError::fetch)?;
        self.commit(PlanningSnapshot::fetched(events, Utc::now()))
            .map_err(PlanningError::fetch)
    }

    /// Publish a stored snapshot unless something was published meanwhile.
    ///
    /// A refresh that committed after the caller's check wins over the
    /// older stored value.
    fn seed(&self, stored: PlanningSnapshot) -> Arc<PlanningSnapshot> {
        let stored = Arc::new(stored);
        let seeded = self.current.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(stored.clone());
            true
        });

        if seeded {
            tracing::debug!(events = stored.len(), "Seeded planning cache from local store");
            return stored;
        }
        self.current().unwrap_or(stored)
    }

    /// Stop accepting writes. Fetches that resolve afterwards are discarded.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> PlanningResult<()> {
        if self.is_closed() {
            return Err(PlanningError::Cancelled);
        }
        Ok(())
    }

    /// Claim the single fetch slot without waiting.
    pub(crate) fn try_begin_fetch(&self) -> Option<MutexGuard<'_, ()>> {
        self.inflight.try_lock().ok()
    }

    pub(crate) async fn fetch(&self) -> PlanningResult<Vec<Event>> {
        self.remote.fetch_planning().await
    }

    /// Persist `snapshot`, then publish it.
    ///
    /// Callers must hold the fetch slot. If persisting fails nothing is
    /// published and the store keeps its previous values.
    pub(crate) fn commit(&self, snapshot: PlanningSnapshot) -> PlanningResult<Arc<PlanningSnapshot>> {
        if self.is_closed() {
            tracing::debug!("View closed while fetching, discarding result");
            return Err(PlanningError::Cancelled);
        }

        self.store.save_snapshot(&snapshot)?;

        let snapshot = Arc::new(snapshot);
        self.current.send_replace(Some(snapshot.clone()));
        tracing::info!(
            key = PLANNING_CACHE_KEY,
            events = snapshot.len(),
            "Planning snapshot replaced"
        );
        Ok(snapshot)
    }
}
