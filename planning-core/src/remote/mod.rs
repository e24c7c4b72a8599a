//! Sources of the authoritative planning.

mod http;
pub mod protocol;
mod provider;

pub use http::HttpSource;
pub use provider::ProviderSource;

use async_trait::async_trait;

use crate::error::{PlanningError, PlanningResult};
use crate::event::Event;

/// Fetches the current user's planning.
///
/// Implementations own transport concerns (timeouts, auth, retries). Events
/// they return are treated as remote regardless of how they are tagged.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_planning(&self) -> PlanningResult<Vec<Event>>;
}

/// Stand-in for a missing `[remote]` table. Every fetch fails with
/// [`PlanningError::NoRemoteConfigured`], so a stored planning can still be
/// shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

#[async_trait]
impl RemoteSource for Unconfigured {
    async fn fetch_planning(&self) -> PlanningResult<Vec<Event>> {
        Err(PlanningError::NoRemoteConfigured)
    }
}
