//! Error types for the planning core.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading, refreshing or exporting the planning.
#[derive(Error, Debug)]
pub enum PlanningError {
    /// The initial seed-or-fetch failed. The view has nothing to show.
    #[error("Could not load planning: {0}")]
    Fetch(#[source] Box<PlanningError>),

    /// A manual refresh failed. The cached planning is still valid.
    #[error("Could not refresh planning: {0}")]
    Refresh(#[source] Box<PlanningError>),

    #[error("A planning refresh is already in progress")]
    RefreshInProgress,

    #[error("Planning has not been loaded yet")]
    NotLoaded,

    #[error("Remote source error: {0}")]
    Remote(String),

    #[error("Remote source timed out after {0:?}")]
    RemoteTimeout(Duration),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("No remote source configured")]
    NoRemoteConfigured,

    #[error("Snapshot store error: {0}")]
    Store(String),

    #[error("ICS encoding error: {0}")]
    Encode(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Invalid date-time '{0}'")]
    InvalidTime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The view was closed while a fetch was outstanding; its result was dropped.
    #[error("Planning view was closed before the fetch completed")]
    Cancelled,
}

impl PlanningError {
    pub(crate) fn fetch(cause: PlanningError) -> Self {
        match cause {
            PlanningError::Cancelled | PlanningError::Fetch(_) => cause,
            other => PlanningError::Fetch(Box::new(other)),
        }
    }

    pub(crate) fn refresh(cause: PlanningError) -> Self {
        match cause {
            PlanningError::Cancelled | PlanningError::Refresh(_) => cause,
            other => PlanningError::Refresh(Box::new(other)),
        }
    }
}

impl From<serde_json::Error> for PlanningError {
    fn from(e: serde_json::Error) -> Self {
        PlanningError::Serialization(e.to_string())
    }
}

/// Result type alias for planning operations.
pub type PlanningResult<T> = Result<T, PlanningError>;
