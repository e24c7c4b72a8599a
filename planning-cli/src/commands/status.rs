use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use planning_core::store::LocalSnapshotStore;
use planning_core::{FileStore, PlanningConfig};

use crate::render::render_last_updated;

/// Show what is stored locally. Never touches the network.
pub fn run(config: &PlanningConfig) -> Result<()> {
    let store = LocalSnapshotStore::new(Arc::new(FileStore::new(config.data_path())));

    println!("{} {}", "Data:".bold(), config.data_path().display());
    println!("{} {}", "Remote:".bold(), describe_remote(config));

    match store.snapshot()? {
        Some(snapshot) => println!("{} {} events", "Planning:".bold(), snapshot.len()),
        None => println!("{} {}", "Planning:".bold(), "not loaded yet".dimmed()),
    }

    let own = store.user_events()?.map_or(0, |events| events.len());
    println!("{} {}", "Own events:".bold(), own);
    println!("{}", render_last_updated(store.last_updated()?, Utc::now()));

    Ok(())
}

fn describe_remote(config: &PlanningConfig) -> String {
    match &config.remote {
        Some(remote) => match (&remote.provider, &remote.url) {
            (Some(provider), _) => format!("planning-provider-{provider}"),
            (None, Some(url)) => url.clone(),
            (None, None) => "incomplete [remote] table".red().to_string(),
        },
        None => "not configured".dimmed().to_string(),
    }
}
