//! Tracing setup.
//!
//! Logs go to stderr so they never mix with rendered output or exported
//! calendars on stdout. `RUST_LOG` wins over the configured level.

use tracing_subscriber::EnvFilter;

use crate::error::{PlanningError, PlanningResult};

pub fn init(level: &str) -> PlanningResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| PlanningError::Config(format!("Invalid log level '{level}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| PlanningError::Config(format!("Could not initialize logging: {e}")))
}

/// Initialize logging for tests. Safe to call more than once.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!("still alive");
    }
}
