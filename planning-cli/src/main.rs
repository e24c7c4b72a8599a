mod commands;
mod notifier;
mod render;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::MultiProgress;
use planning_core::remote::Unconfigured;
use planning_core::{FileStore, Planning, PlanningConfig, PlanningError, RemoteSource, logging};

use crate::notifier::TerminalNotifier;

#[derive(Parser)]
#[command(name = "planning")]
#[command(about = "Your planning in the terminal, cached locally and exportable as .ics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the week (Monday to Saturday) or a single day
    Show {
        /// Show a single day instead of the week
        #[arg(long)]
        day: bool,

        /// Day to show, or a day in the week to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Fetch the planning again from the remote
    Refresh,
    /// Write the planning and your own events to an .ics file
    Export {
        /// Directory to write to (defaults to export_dir from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show what is stored locally
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = PlanningConfig::load()?;
    logging::init(&config.log_level)?;

    let progress = MultiProgress::new();

    match cli.command {
        Commands::Show { day, date } => {
            let planning = open_planning(&config, &progress)?;
            commands::show::run(&planning, &progress, day, date.as_deref()).await
        }
        Commands::Refresh => {
            let planning = open_planning(&config, &progress)?;
            commands::refresh::run(&planning, &progress).await
        }
        Commands::Export { output } => {
            let planning = open_planning(&config, &progress)?;
            let dir = output.unwrap_or_else(|| config.export_path());
            commands::export::run(&planning, &progress, dir).await
        }
        Commands::Status => commands::status::run(&config),
    }
}

fn open_planning(config: &PlanningConfig, progress: &MultiProgress) -> Result<Planning> {
    let remote: Arc<dyn RemoteSource> = match config.remote_source() {
        Ok(remote) => remote,
        Err(PlanningError::NoRemoteConfigured) => {
            tracing::debug!("No [remote] table in config, only a stored planning can be shown");
            Arc::new(Unconfigured)
        }
        Err(e) => return Err(e.into()),
    };

    let store = Arc::new(FileStore::new(config.data_path()));
    let notifier = Arc::new(TerminalNotifier::new(progress.clone()));

    Ok(Planning::new(remote, store, notifier).with_export_filename(&config.export_filename))
}
