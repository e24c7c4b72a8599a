pub mod export;
pub mod refresh;
pub mod show;
pub mod status;

use anyhow::Result;
use indicatif::MultiProgress;
use planning_core::{Planning, PlanningError};

use crate::utils::tui::spinner;

/// Load the planning behind a spinner. Ctrl-C closes the view so a fetch
/// still in flight never writes to the store.
pub async fn load(planning: &Planning, progress: &MultiProgress) -> Result<()> {
    let spinner = spinner(progress, "Loading planning");

    let result = tokio::select! {
        result = planning.activate() => result.map(|_| ()),
        _ = tokio::signal::ctrl_c() => {
            planning.close();
            Err(PlanningError::Cancelled)
        }
    };

    spinner.finish_and_clear();
    Ok(result?)
}
