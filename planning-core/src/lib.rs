//! Core of the planning view.
//!
//! This crate loads the user's planning cache-first, refreshes it on demand,
//! merges in the events the user added locally and exports the result as an
//! ICS calendar:
//! - [`Planning`] is the facade a renderer talks to
//! - [`PlanningCache`] and [`RefreshCoordinator`] own the snapshot lifecycle
//! - [`remote`], [`store`] and [`export`] are the seams to the outside world

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod ics;
pub mod logging;
pub mod notify;
pub mod planning;
pub mod refresh;
pub mod remote;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod testing;

pub use aggregate::aggregate;
pub use cache::PlanningCache;
pub use config::{PlanningConfig, RemoteConfig};
pub use error::{PlanningError, PlanningResult};
pub use event::*;
pub use export::{ExportSink, FileExportSink};
pub use notify::{LogNotifier, Notification, NotificationKind, Notifier};
pub use planning::Planning;
pub use refresh::RefreshCoordinator;
pub use remote::RemoteSource;
pub use snapshot::PlanningSnapshot;
pub use store::{FileStore, MemoryStore, SnapshotStore};
