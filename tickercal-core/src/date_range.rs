//! Calendar view windows and day columns.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Display granularity of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "week")]
    Week,
    #[default]
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "2month")]
    TwoMonth,
    #[serde(rename = "3month")]
    ThreeMonth,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Week => "week",
            ViewMode::Month => "month",
            ViewMode::TwoMonth => "2month",
            ViewMode::ThreeMonth => "3month",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            "2month" => Ok(ViewMode::TwoMonth),
            "3month" => Ok(ViewMode::ThreeMonth),
            other => Err(format!(
                "Unknown view mode '{}'. Expected week, month, 2month or 3month",
                other
            )),
        }
    }
}

/// Inclusive day window shown by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Inclusive day count, accounting for month/year rollover.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// One column per calendar day in `[start, end]`, in order.
    pub fn day_columns(&self) -> Vec<DayColumn> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .map(DayColumn::for_date)
            .collect()
    }
}

/// Weekday labels indexed Sunday-first.
const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One calendar date rendered as a grid column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub date: NaiveDate,
    /// 3-letter weekday abbreviation
    pub label: &'static str,
    /// Day-of-month number
    pub day: u32,
}

impl DayColumn {
    fn for_date(date: NaiveDate) -> DayColumn {
        DayColumn {
            date,
            label: DAY_LABELS[date.weekday().num_days_from_sunday() as usize],
            day: date.day(),
        }
    }
}

/// Resolve the window shown for a view mode and anchor date.
///
/// Week windows run Monday through Sunday around the anchor; month-based
/// windows run from the first day of the anchor's month to the last day
/// of the final month. The anchor is assumed valid; no input validation
/// happens here.
pub fn resolve_date_range(mode: ViewMode, anchor: NaiveDate) -> DateWindow {
    match mode {
        ViewMode::Week => {
            let start = anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
            DateWindow {
                start,
                end: start + Duration::days(6),
            }
        }
        ViewMode::Month => months_window(anchor, 0),
        ViewMode::TwoMonth => months_window(anchor, 1),
        ViewMode::ThreeMonth => months_window(anchor, 2),
    }
}

/// Window covering the anchor's month plus `extra` following months.
fn months_window(anchor: NaiveDate, extra: u32) -> DateWindow {
    let start = first_of_month(anchor.year(), anchor.month());
    // Last day of the final month: first of the month after it, minus one day.
    let (after_year, after_month) = add_months(anchor.year(), anchor.month(), extra + 1);
    let end = first_of_month(after_year, after_month) - Duration::days(1);
    DateWindow { start, end }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn add_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let total = month - 1 + months;
    (year + (total / 12) as i32, total % 12 + 1)
}

/// Step the anchor backward or forward by one view unit: seven days in
/// week mode, one month otherwise.
pub fn step(mode: ViewMode, anchor: NaiveDate, delta: i32) -> NaiveDate {
    match mode {
        ViewMode::Week => anchor + Duration::days(7 * delta as i64),
        _ => {
            if delta >= 0 {
                anchor
                    .checked_add_months(Months::new(delta as u32))
                    .unwrap_or(anchor)
            } else {
                anchor
                    .checked_sub_months(Months::new(delta.unsigned_abs()))
                    .unwrap_or(anchor)
            }
        }
    }
}
