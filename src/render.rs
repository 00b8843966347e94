//! Terminal rendering for tickercal types.
//!
//! Extension traits and helpers that add colored terminal output to
//! tickercal-core types using owo_colors.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tickercal_core::date_range::{DateWindow, DayColumn, ViewMode};
use tickercal_core::event::{Event, RsvpColor};
use tickercal_core::source::DataOrigin;

/// Extension trait for colored rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = match self.start {
            Some(dt) => dt.format("%b %-d %H:%M").to_string(),
            None => "(no date)".to_string(),
        };

        // RSVP color code: accepted green, declined yellow, pending grey
        let title = match self.rsvp.color() {
            RsvpColor::Green => self.title.green().to_string(),
            RsvpColor::Yellow => self.title.yellow().to_string(),
            RsvpColor::Grey => self.title.to_string(),
        };

        let tickers: Vec<&str> = self.companies.iter().map(|c| c.ticker.as_str()).collect();
        let tag = format!("[{}]", tickers.join(","));

        format!("{:>12}  {} {}", time, title, tag.dimmed())
    }
}

/// One event line with a countdown hint for imminent events.
pub fn event_line(event: &Event, now: DateTime<Utc>) -> String {
    match starts_in(event, now) {
        Some(hint) => format!("{} {}", event.render(), hint.dimmed()),
        None => event.render(),
    }
}

/// "in 2h 30m" for events starting within the next day.
fn starts_in(event: &Event, now: DateTime<Utc>) -> Option<String> {
    let start = event.start?;
    let until = start - now;
    if until < chrono::Duration::zero() || until > chrono::Duration::days(1) {
        return None;
    }

    // Whole minutes read better than second precision
    let secs = (until.num_seconds() / 60) * 60;
    let duration = std::time::Duration::from_secs(secs.max(0) as u64);
    Some(format!("in {}", humantime::format_duration(duration)))
}

/// Informational banner when the dashboard is running on sample data.
pub fn sample_data_banner(origin: DataOrigin) -> Option<String> {
    match origin {
        DataOrigin::Fixture => Some(
            "Showing sample data (no live source)"
                .yellow()
                .to_string(),
        ),
        DataOrigin::Remote => None,
    }
}

pub fn window_heading(mode: ViewMode, window: &DateWindow) -> String {
    format!(
        "{} to {} ({})",
        window.start.format("%b %-d %Y"),
        window.end.format("%b %-d %Y"),
        mode
    )
}

/// Render the window's day columns as week-sized rows: a label line and
/// a day line carrying per-day event counts.
pub fn render_grid(window: &DateWindow, events: &[Event]) -> String {
    let columns = window.day_columns();
    let mut lines = Vec::new();

    for week in columns.chunks(7) {
        let labels: Vec<String> = week.iter().map(|c| format!("{:>8}", c.label)).collect();
        lines.push(labels.join("").dimmed().to_string());

        let days: Vec<String> = week
            .iter()
            .map(|column| {
                let count = events
                    .iter()
                    .filter(|e| e.start_date() == Some(column.date))
                    .count();
                day_cell(column, count)
            })
            .collect();
        lines.push(days.join(""));
    }

    lines.join("\n")
}

fn day_cell(column: &DayColumn, count: usize) -> String {
    if count > 0 {
        let cell = format!("{:>5}:{:<2}", column.day, count);
        cell.green().to_string()
    } else {
        let cell = format!("{:>5}   ", column.day);
        cell.dimmed().to_string()
    }
}
