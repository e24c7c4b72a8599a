//! Terminal rendering of the planning.
//!
//! The week view runs Monday to Saturday (Sunday is hidden) and only shows
//! what falls inside the 07:00-22:00 slot window.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use owo_colors::OwoColorize;
use planning_core::{Event, EventTime};

/// First visible minute of a day
const SLOT_MIN: u32 = 7 * 60;
/// End of the visible window
const SLOT_MAX: u32 = 22 * 60;
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = if self.start.is_all_day() {
            format!("{:>11}", "all-day")
        } else {
            format!(
                "{}-{}",
                local_naive(&self.start).format("%H:%M"),
                local_naive(&self.end).format("%H:%M")
            )
        };

        let title = if self.is_local() {
            self.title.cyan().to_string()
        } else {
            self.title.bold().to_string()
        };

        let mut line = format!("{} {}", time.dimmed(), title);
        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        line
    }
}

/// The days a view covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    days: Vec<NaiveDate>,
}

impl View {
    /// Monday to Saturday of the week containing `date`.
    pub fn week(date: NaiveDate) -> Self {
        let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        View {
            days: (0..6).map(|i| monday + Duration::days(i)).collect(),
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        View { days: vec![date] }
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Events of `day` that show in the slot window, earliest first.
    pub fn visible_on<'a>(&self, day: NaiveDate, events: &'a [Event]) -> Vec<&'a Event> {
        let mut visible: Vec<&Event> = events.iter().filter(|e| shows_on(e, day)).collect();
        visible.sort_by_key(|e| local_naive(&e.start));
        visible
    }

    pub fn render(&self, events: &[Event]) -> String {
        let today = Local::now().date_naive();
        let mut lines = Vec::new();

        for (i, day) in self.days.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(format_date_label(*day, today).bold().to_string());

            let visible = self.visible_on(*day, events);
            if visible.is_empty() {
                lines.push(format!("  {}", "No events".dimmed()));
            }
            for event in visible {
                lines.push(format!("  {}", event.render()));
            }
        }

        lines.join("\n")
    }
}

/// "Dernière actualisation : il y a 5m" or "... : jamais".
pub fn render_last_updated(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let label = "Dernière actualisation :";

    let Some(at) = last_updated else {
        return format!("{} {}", label.dimmed(), "jamais".dimmed());
    };

    // Drop the seconds, "il y a 4m 12s" is noise
    let elapsed = (now - at).to_std().unwrap_or_default();
    let elapsed = std::time::Duration::from_secs(elapsed.as_secs() / 60 * 60);

    let ago = if elapsed.is_zero() {
        "à l'instant".to_string()
    } else {
        format!("il y a {}", humantime::format_duration(elapsed))
    };
    format!("{} {}", label.dimmed(), ago.dimmed())
}

/// Wall-clock time of an event boundary on this machine.
fn local_naive(time: &EventTime) -> NaiveDateTime {
    match time {
        EventTime::Zoned(dt) => dt.with_timezone(&Local).naive_local(),
        EventTime::Floating(dt) => *dt,
        EventTime::Date(d) => d.and_time(NaiveTime::default()),
    }
}

fn shows_on(event: &Event, day: NaiveDate) -> bool {
    if event.start.is_all_day() {
        // DTEND of an all-day event is exclusive
        let end = event.end.date().max(event.start.date() + Duration::days(1));
        return event.start.date() <= day && day < end;
    }

    let start = local_naive(&event.start);
    let end = local_naive(&event.end);
    if start.date() > day || end.date() < day {
        return false;
    }

    let from = if start.date() < day { 0 } else { minutes(start.time()) };
    let to = if end.date() > day { MINUTES_PER_DAY } else { minutes(end.time()) };

    // Zero-length events still show when they sit inside the window
    from < SLOT_MAX && (to > SLOT_MIN || (from == to && from >= SLOT_MIN))
}

fn minutes(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}
