use anyhow::Result;
use indicatif::MultiProgress;
use owo_colors::OwoColorize;
use planning_core::Planning;

use crate::utils::tui::spinner;

pub async fn run(planning: &Planning, progress: &MultiProgress) -> Result<()> {
    let spinner = spinner(progress, "Refreshing planning");

    let snapshot = planning
        .refresh_with_completion(|| spinner.finish_and_clear())
        .await?;

    let count = format!("{} events in planning", snapshot.len());
    println!("{}", count.dimmed());
    Ok(())
}
