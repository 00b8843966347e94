//! Free-text date interpretation.
//!
//! Lets one search input serve double duty: text that looks like a date
//! jumps the calendar view, anything else becomes a plain text filter.
//! Date-shaped input always wins; a useful text query is unlikely to
//! collide with a recognized date token.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// How a free-text search input should be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query is date-shaped: navigate the calendar to this date.
    JumpTo(NaiveDate),
    /// Plain text: filter events instead.
    Filter(String),
}

pub fn resolve_search(query: &str, today: NaiveDate) -> SearchOutcome {
    match parse_date_query(query, today) {
        Some(date) => SearchOutcome::JumpTo(date),
        None => SearchOutcome::Filter(query.trim().to_string()),
    }
}

/// Explicit date formats tried in order; first successful parse wins.
const FORMATS_WITH_YEAR: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%B %d %Y", "%b %d %Y"];
/// Year-less formats get the current year substituted before parsing.
const FORMATS_WITHOUT_YEAR: [&str; 3] = ["%m/%d", "%B %d", "%b %d"];

/// Interpret free text as a calendar date.
///
/// Tried in priority order: `today` / `tomorrow` / `yesterday`, then
/// `next <weekday>`, then the explicit format lists. Returns None when
/// nothing matches, which is a normal outcome (the caller falls back to
/// text filtering), not an error.
pub fn parse_date_query(query: &str, today: NaiveDate) -> Option<NaiveDate> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    match normalized.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = normalized.strip_prefix("next ") {
        if let Some(weekday) = parse_weekday(rest.trim()) {
            return Some(next_weekday(today, weekday));
        }
    }

    parse_explicit(&normalized, today)
}

/// The next occurrence of `weekday` strictly after `today`.
/// When today already is that weekday, this lands a full week out.
fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    match ahead {
        0 => today + Duration::days(7),
        n => today + Duration::days(n),
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_explicit(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    for fmt in FORMATS_WITH_YEAR {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Some(date);
        }
    }

    let with_year = format!("{} {}", input, today.year());
    for fmt in FORMATS_WITHOUT_YEAR {
        let fmt_with_year = format!("{} %Y", fmt);
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, &fmt_with_year) {
            return Some(date);
        }
    }

    None
}
