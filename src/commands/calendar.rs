use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use tickercal_core::config::GlobalConfig;
use tickercal_core::dashboard::Dashboard;
use tickercal_core::date_query::parse_date_query;
use tickercal_core::date_range::{resolve_date_range, ViewMode};
use tickercal_core::event::Event;
use tickercal_core::query::{filter_events, EventQuery};

use crate::render::{self, Render};
use crate::utils::tui::create_spinner;

pub async fn run(config: &GlobalConfig, view: Option<String>, date: Option<String>) -> Result<()> {
    let view: ViewMode = match view {
        Some(v) => v.parse().map_err(anyhow::Error::msg)?,
        None => config.default_view,
    };

    let now = Utc::now();
    let today = now.date_naive();
    let anchor = match &date {
        Some(d) => parse_date_query(d, today)
            .ok_or_else(|| anyhow::anyhow!("Unrecognized date '{}'", d))?,
        None => today,
    };
    let window = resolve_date_range(view, anchor);

    let source = config.source()?;
    let spinner = create_spinner("Loading events".to_string());
    let dashboard = Dashboard::load(source.as_ref()).await;
    spinner.finish_and_clear();

    if let Some(banner) = render::sample_data_banner(dashboard.origin()) {
        println!("{banner}\n");
    }

    let query = EventQuery {
        window: Some(window),
        ..Default::default()
    };
    let events = filter_events(dashboard.events(), &query, now);

    println!("{}", render::window_heading(view, &window).bold());
    println!();
    println!("{}", render::render_grid(&window, &events));

    if events.is_empty() {
        println!();
        println!("{}", "No events in this window".dimmed());
        return Ok(());
    }

    // Day-by-day detail below the grid
    println!();
    for column in window.day_columns() {
        let on_day: Vec<&Event> = events
            .iter()
            .filter(|e| e.start_date() == Some(column.date))
            .collect();
        if on_day.is_empty() {
            continue;
        }

        println!(
            "{}",
            format!("{} {}", column.label, column.date.format("%b %-d")).bold()
        );
        for event in on_day {
            println!("  {}", event.render());
        }
        println!();
    }

    Ok(())
}
