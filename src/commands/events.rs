use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use tickercal_core::config::GlobalConfig;
use tickercal_core::dashboard::Dashboard;
use tickercal_core::date_query::{parse_date_query, resolve_search, SearchOutcome};
use tickercal_core::date_range::{resolve_date_range, ViewMode};
use tickercal_core::query::{filter_events, group_by_bucket, EventCategory, EventQuery, SortKey};

use crate::render;
use crate::utils::tui::create_spinner;

pub struct Options {
    pub search: Option<String>,
    pub company: Option<String>,
    pub category: String,
    pub rsvp_only: bool,
    pub sort: String,
    pub view: Option<String>,
    pub date: Option<String>,
}

pub async fn run(config: &GlobalConfig, opts: Options) -> Result<()> {
    let category: EventCategory = opts.category.parse().map_err(anyhow::Error::msg)?;
    let sort: SortKey = opts.sort.parse().map_err(anyhow::Error::msg)?;
    let view: Option<ViewMode> = opts
        .view
        .as_deref()
        .map(|v| v.parse().map_err(anyhow::Error::msg))
        .transpose()?;

    let now = Utc::now();
    let today = now.date_naive();

    let mut anchor = match &opts.date {
        Some(d) => Some(
            parse_date_query(d, today)
                .ok_or_else(|| anyhow::anyhow!("Unrecognized date '{}'", d))?,
        ),
        None => None,
    };

    // The search box serves double duty: date-shaped input moves the
    // window, anything else filters by text.
    let mut text = None;
    if let Some(q) = &opts.search {
        match resolve_search(q, today) {
            SearchOutcome::JumpTo(date) => anchor = Some(date),
            SearchOutcome::Filter(t) => {
                if !t.is_empty() {
                    text = Some(t);
                }
            }
        }
    }

    let source = config.source()?;
    let spinner = create_spinner("Loading events".to_string());
    let dashboard = Dashboard::load(source.as_ref()).await;
    spinner.finish_and_clear();

    if let Some(banner) = render::sample_data_banner(dashboard.origin()) {
        println!("{banner}\n");
    }

    // An explicit view or anchor restricts the list to that window
    let window = match (view, anchor) {
        (None, None) => None,
        (v, a) => Some(resolve_date_range(
            v.unwrap_or(config.default_view),
            a.unwrap_or(today),
        )),
    };

    let company = match &opts.company {
        Some(ticker) => Some(super::resolve_company_id(&dashboard, ticker)?),
        None => None,
    };

    let query = EventQuery {
        text,
        company,
        category,
        rsvp_only: opts.rsvp_only,
        window,
        sort,
    };
    let filtered = filter_events(dashboard.events(), &query, now);

    if filtered.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    match sort {
        // Date-sorted lists read best as relative-date buckets
        SortKey::Date => {
            for (i, (bucket, events)) in group_by_bucket(&filtered, today).iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", bucket.label().bold());
                for event in events {
                    println!("  {}", render::event_line(event, now));
                }
            }
        }
        _ => {
            for event in &filtered {
                println!("{}", render::event_line(event, now));
            }
        }
    }

    Ok(())
}
