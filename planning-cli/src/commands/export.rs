use std::path::PathBuf;

use anyhow::Result;
use indicatif::MultiProgress;
use owo_colors::OwoColorize;
use planning_core::{FileExportSink, Planning};

pub async fn run(planning: &Planning, progress: &MultiProgress, dir: PathBuf) -> Result<()> {
    super::load(planning, progress).await?;

    let count = planning.events()?.len();
    let path = planning.export_calendar(&FileExportSink::new(dir))?;

    println!(
        "{} {} events to {}",
        "Exported".green(),
        count,
        path.display()
    );
    Ok(())
}
