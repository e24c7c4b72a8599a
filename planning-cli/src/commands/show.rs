use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use indicatif::MultiProgress;
use planning_core::Planning;

use crate::render::{View, render_last_updated};

pub async fn run(
    planning: &Planning,
    progress: &MultiProgress,
    day: bool,
    date: Option<&str>,
) -> Result<()> {
    let date = match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };

    super::load(planning, progress).await?;
    let events = planning.events()?;

    let view = if day { View::day(date) } else { View::week(date) };
    println!("{}", view.render(&events));
    println!();
    println!("{}", render_last_updated(planning.last_updated(), Utc::now()));

    Ok(())
}
