//! Manual refresh of the planning.

use std::sync::Arc;

use chrono::Utc;

use crate::cache::PlanningCache;
use crate::error::{PlanningError, PlanningResult};
use crate::notify::{Notification, Notifier};
use crate::snapshot::PlanningSnapshot;

pub struct RefreshCoordinator {
    cache: Arc<PlanningCache>,
    notifier: Arc<dyn Notifier>,
}

impl RefreshCoordinator {
    pub fn new(cache: Arc<PlanningCache>, notifier: Arc<dyn Notifier>) -> Self {
        RefreshCoordinator { cache, notifier }
    }

    /// Fetch the planning again, bypassing any cached value.
    ///
    /// On success the store and the cache both hold the new snapshot and a
    /// success notification is sent. On failure neither is touched, an error
    /// notification is sent and the error comes back as
    /// [`PlanningError::Refresh`].
    ///
    /// Only one fetch runs at a time: calling this while a refresh (or the
    /// initial load) is in flight returns [`PlanningError::RefreshInProgress`]
    /// without hitting the network or notifying.
    pub async fn refresh(&self) -> PlanningResult<Arc<PlanningSnapshot>> {
        match self.fetch_and_commit().await {
            Ok(snapshot) => {
                self.notifier.notify(Notification::refresh_succeeded());
                Ok(snapshot)
            }
            Err(e @ (PlanningError::RefreshInProgress | PlanningError::Cancelled)) => Err(e),
            Err(e) => {
                self.notifier.notify(Notification::refresh_failed(&e.to_string()));
                Err(e)
            }
        }
    }

    async fn fetch_and_commit(&self) -> PlanningResult<Arc<PlanningSnapshot>> {
        let Some(_inflight) = self.cache.try_begin_fetch() else {
            tracing::debug!("Refresh requested while a fetch is in flight");
            return Err(PlanningError::RefreshInProgress);
        };

        tracing::info!("Refreshing planning");

        let events = self.cache.fetch().await.map_err(|e| {
            tracing::warn!(error = %e, "Planning refresh failed");
            PlanningError::refresh(e)
        })?;

        self.cache
            .commit(PlanningSnapshot::fetched(events, Utc::now()))
            .map_err(PlanningError::refresh)
    }

    /// Like [`refresh`](Self::refresh), then call `complete` whatever the
    /// outcome, so a pull-to-refresh gesture always ends.
    pub async fn refresh_with_completion<F>(&self, complete: F) -> PlanningResult<Arc<PlanningSnapshot>>
    where
        F: FnOnce(),
    {
        let result = self.refresh().await;
        complete();
        result
    }
}
