//! Event filtering, sorting, and date-bucket grouping.
//!
//! Pure functions over an in-memory snapshot. Nothing here touches the
//! clock or does I/O; the caller passes the evaluation instant, so every
//! call is deterministic given its inputs. Input lists are never mutated,
//! only new filtered views are derived.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::date_range::DateWindow;
use crate::event::{Event, HostType, RsvpStatus};

/// Filter criteria for a single query. `Default` means "no criteria":
/// every event comes back, sorted by date.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Case-insensitive substring match across title, description,
    /// company name, ticker, subsector, and location text.
    pub text: Option<String>,
    /// Restrict to events whose companies contain this id. Also the
    /// target company for the Hosted/Attended categories.
    pub company: Option<String>,
    pub category: EventCategory,
    /// Restrict to events the user has accepted.
    pub rsvp_only: bool,
    /// Restrict to events starting within this window, at day granularity.
    pub window: Option<DateWindow>,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventCategory {
    #[default]
    All,
    /// Some host entry resolves to the target company.
    Hosted,
    /// The target company attends but does not host.
    Attended,
    Upcoming,
    Past,
    SingleCorpHost,
    MultiCorpHost,
    NonCompanyHost,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::All => "all",
            EventCategory::Hosted => "hosted",
            EventCategory::Attended => "attended",
            EventCategory::Upcoming => "upcoming",
            EventCategory::Past => "past",
            EventCategory::SingleCorpHost => "single_corp_host",
            EventCategory::MultiCorpHost => "multi_corp_host",
            EventCategory::NonCompanyHost => "non_company_host",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(EventCategory::All),
            "hosted" => Ok(EventCategory::Hosted),
            "attended" => Ok(EventCategory::Attended),
            "upcoming" => Ok(EventCategory::Upcoming),
            "past" => Ok(EventCategory::Past),
            "single_corp_host" => Ok(EventCategory::SingleCorpHost),
            "multi_corp_host" => Ok(EventCategory::MultiCorpHost),
            "non_company_host" => Ok(EventCategory::NonCompanyHost),
            other => Err(format!("Unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Company,
    Subsector,
    Status,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "company" => Ok(SortKey::Company),
            "subsector" => Ok(SortKey::Subsector),
            "status" => Ok(SortKey::Status),
            other => Err(format!(
                "Unknown sort key '{}'. Expected date, company, subsector or status",
                other
            )),
        }
    }
}

/// Filter and sort a snapshot of events.
///
/// Every criterion is total over well-typed input: a missing or
/// malformed start instant simply fails to match any date criterion
/// (the event is excluded rather than raising).
pub fn filter_events(events: &[Event], query: &EventQuery, now: DateTime<Utc>) -> Vec<Event> {
    let needle = query.text.as_deref().map(str::to_lowercase);
    let target = query.company.as_deref();

    let mut result: Vec<Event> = events
        .iter()
        .filter(|e| matches_text(e, needle.as_deref()))
        .filter(|e| target.is_none_or(|id| e.includes_company(id)))
        .filter(|e| matches_category(e, query.category, target, now))
        .filter(|e| !query.rsvp_only || e.rsvp == RsvpStatus::Accepted)
        .filter(|e| matches_window(e, query.window.as_ref()))
        .cloned()
        .collect();

    sort_events(&mut result, query.sort);
    result
}

fn matches_text(event: &Event, needle: Option<&str>) -> bool {
    let Some(needle) = needle else { return true };
    if needle.is_empty() {
        return true;
    }

    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&event.title)
        || event.description.as_deref().is_some_and(contains)
        || event.location.as_deref().is_some_and(contains)
        || event.companies.iter().any(|c| {
            contains(&c.name)
                || contains(&c.ticker)
                || c.subsector.as_deref().is_some_and(contains)
        })
}

fn matches_category(
    event: &Event,
    category: EventCategory,
    target: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    match category {
        EventCategory::All => true,
        // Hosted/Attended need a target company; without one nothing matches.
        EventCategory::Hosted => target.is_some_and(|id| event.hosted_by(id)),
        EventCategory::Attended => {
            target.is_some_and(|id| event.includes_company(id) && !event.hosted_by(id))
        }
        EventCategory::Upcoming => event.start.is_some_and(|s| s >= now),
        EventCategory::Past => event.start.is_some_and(|s| s < now),
        EventCategory::SingleCorpHost => event.has_host_type(HostType::SingleCorp),
        EventCategory::MultiCorpHost => event.has_host_type(HostType::MultiCorp),
        EventCategory::NonCompanyHost => event.has_host_type(HostType::NonCompany),
    }
}

fn matches_window(event: &Event, window: Option<&DateWindow>) -> bool {
    let Some(window) = window else { return true };
    // Day granularity: the start instant's calendar date must fall inside.
    event.start_date().is_some_and(|d| window.contains(d))
}

fn sort_events(events: &mut [Event], key: SortKey) {
    match key {
        // Missing starts sort last; the sort is stable so ties keep input order.
        SortKey::Date => events.sort_by_key(|e| (e.start.is_none(), e.start)),
        SortKey::Company => events.sort_by(|a, b| company_key(a).cmp(&company_key(b))),
        SortKey::Subsector => events.sort_by(|a, b| subsector_key(a).cmp(&subsector_key(b))),
        SortKey::Status => events.sort_by_key(|e| e.rsvp.as_str()),
    }
}

fn company_key(event: &Event) -> String {
    event
        .primary_company()
        .map(|c| c.ticker.to_lowercase())
        .unwrap_or_default()
}

fn subsector_key(event: &Event) -> String {
    event
        .primary_company()
        .and_then(|c| c.subsector.as_deref())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Relative-date buckets used by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBucket {
    /// Calendar date before today. Keeps the grouping a true partition
    /// when the input was not pre-filtered to upcoming events.
    Earlier,
    Today,
    Tomorrow,
    /// Day 2 through day 6 from today
    ThisWeek,
    /// Day 7 through day 13
    NextWeek,
    /// Day 14 and beyond
    Later,
}

const BUCKET_ORDER: [DateBucket; 6] = [
    DateBucket::Earlier,
    DateBucket::Today,
    DateBucket::Tomorrow,
    DateBucket::ThisWeek,
    DateBucket::NextWeek,
    DateBucket::Later,
];

impl DateBucket {
    pub fn label(&self) -> &'static str {
        match self {
            DateBucket::Earlier => "Earlier",
            DateBucket::Today => "Today",
            DateBucket::Tomorrow => "Tomorrow",
            DateBucket::ThisWeek => "This week",
            DateBucket::NextWeek => "Next week",
            DateBucket::Later => "Later",
        }
    }

    fn for_offset(days: i64) -> DateBucket {
        match days {
            d if d < 0 => DateBucket::Earlier,
            0 => DateBucket::Today,
            1 => DateBucket::Tomorrow,
            2..=6 => DateBucket::ThisWeek,
            7..=13 => DateBucket::NextWeek,
            _ => DateBucket::Later,
        }
    }
}

/// Partition events into relative-date buckets.
///
/// Buckets come back in display order with empty buckets omitted; events
/// within a bucket are ascending by start instant, ties keeping input
/// order. Events without a parseable start are excluded.
pub fn group_by_bucket(events: &[Event], today: NaiveDate) -> Vec<(DateBucket, Vec<Event>)> {
    let mut grouped: Vec<(DateBucket, Vec<Event>)> =
        BUCKET_ORDER.iter().map(|b| (*b, Vec::new())).collect();

    for event in events {
        let Some(date) = event.start_date() else {
            continue;
        };
        let bucket = DateBucket::for_offset((date - today).num_days());
        if let Some((_, members)) = grouped.iter_mut().find(|(b, _)| *b == bucket) {
            members.push(event.clone());
        }
    }

    for (_, members) in &mut grouped {
        members.sort_by_key(|e| e.start);
    }

    grouped
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::Company;
    use crate::date_range::{resolve_date_range, ViewMode};
    use crate::event::{EventType, Host, LocationType};
    use chrono::TimeZone;

    fn make_company(id: &str, ticker: &str) -> Company {
        Company {
            id: id.to_string(),
            ticker: ticker.to_string(),
            name: format!("{} Inc", ticker),
            sector: Some("Technology".to_string()),
            subsector: Some("Semiconductors".to_string()),
        }
    }

    fn make_event(id: &str, start: Option<&str>) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {}", id),
            description: None,
            location: None,
            start: start.map(|s| {
                DateTime::parse_from_rfc3339(s)
                    .expect("test timestamp should be valid")
                    .with_timezone(&Utc)
            }),
            end: None,
            event_type: EventType::Standard,
            location_type: LocationType::Virtual,
            companies: vec![make_company("c1", "ACME")],
            hosts: vec![],
            rsvp: RsvpStatus::Pending,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_criteria_returns_every_event_once() {
        let events = vec![
            make_event("e1", Some("2024-06-12T10:00:00Z")),
            make_event("e2", Some("2024-06-10T10:00:00Z")),
            make_event("e3", None),
        ];

        let result = filter_events(&events, &EventQuery::default(), at(2024, 6, 1));

        assert_eq!(result.len(), 3, "category=all must be an identity filter");
        let mut ids: Vec<&str> = result.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["e1", "e2", "e3"]);
        // Date sort: ascending, missing start last
        assert_eq!(result[0].id, "e2");
        assert_eq!(result[1].id, "e1");
        assert_eq!(result[2].id, "e3");
    }

    #[test]
    fn test_upcoming_and_past_against_evaluation_instant() {
        let events = vec![make_event("e1", Some("2024-06-10T14:00:00Z"))];

        let upcoming = EventQuery {
            category: EventCategory::Upcoming,
            ..Default::default()
        };
        let result = filter_events(&events, &upcoming, at(2024, 6, 1));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "e1");

        let result = filter_events(&events, &upcoming, at(2024, 6, 15));
        assert!(result.is_empty(), "Started events are no longer upcoming");

        let past = EventQuery {
            category: EventCategory::Past,
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &past, at(2024, 6, 15)).len(), 1);
        assert!(filter_events(&events, &past, at(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_hosted_checks_every_host_entry() {
        let mut hosted = make_event("e1", None);
        hosted.hosts = vec![
            Host::NonCompany {
                organizer: "Conference Group".to_string(),
            },
            Host::SingleCorp {
                host_id: "c1".to_string(),
            },
        ];
        let mut attended = make_event("e2", None);
        attended.hosts = vec![Host::SingleCorp {
            host_id: "other".to_string(),
        }];
        let events = vec![hosted, attended];

        let query = EventQuery {
            company: Some("c1".to_string()),
            category: EventCategory::Hosted,
            ..Default::default()
        };
        let result = filter_events(&events, &query, at(2024, 6, 1));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "e1");
        assert!(
            result.iter().all(|e| e.hosted_by("c1")),
            "Every hosted result must have a host resolving to the target"
        );
    }

    #[test]
    fn test_attended_and_hosted_are_disjoint() {
        let mut hosted = make_event("e1", None);
        hosted.hosts = vec![Host::SingleCorp {
            host_id: "c1".to_string(),
        }];
        let attended = make_event("e2", None);
        let events = vec![hosted, attended];
        let now = at(2024, 6, 1);

        let hosted_q = EventQuery {
            company: Some("c1".to_string()),
            category: EventCategory::Hosted,
            ..Default::default()
        };
        let attended_q = EventQuery {
            category: EventCategory::Attended,
            ..hosted_q.clone()
        };

        let hosted_ids: Vec<String> = filter_events(&events, &hosted_q, now)
            .into_iter()
            .map(|e| e.id)
            .collect();
        let attended_ids: Vec<String> = filter_events(&events, &attended_q, now)
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(hosted_ids, ["e1"]);
        assert_eq!(attended_ids, ["e2"]);
        assert!(
            hosted_ids.iter().all(|id| !attended_ids.contains(id)),
            "hosted and attended must not overlap for the same company"
        );
    }

    #[test]
    fn test_hosted_without_target_company_matches_nothing() {
        let mut event = make_event("e1", None);
        event.hosts = vec![Host::SingleCorp {
            host_id: "c1".to_string(),
        }];

        let query = EventQuery {
            category: EventCategory::Hosted,
            ..Default::default()
        };
        assert!(filter_events(&[event], &query, at(2024, 6, 1)).is_empty());
    }

    #[test]
    fn test_host_type_categories_ignore_target() {
        let mut multi = make_event("e1", None);
        multi.hosts = vec![Host::MultiCorp {
            companies: vec![],
        }];
        let mut non = make_event("e2", None);
        non.hosts = vec![Host::NonCompany {
            organizer: "IR Society".to_string(),
        }];
        let events = vec![multi, non];

        let query = EventQuery {
            company: Some("unrelated".to_string()),
            ..Default::default()
        };
        // Company restriction still applies, but the host-type test itself
        // does not care which company is targeted.
        let multi_q = EventQuery {
            category: EventCategory::MultiCorpHost,
            company: None,
            ..query
        };
        let result = filter_events(&events, &multi_q, at(2024, 6, 1));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "e1");
    }

    #[test]
    fn test_free_text_searches_all_fields() {
        let mut event = make_event("e1", None);
        event.title = "Q3 Earnings Call".to_string();
        event.description = Some("Quarterly results webcast".to_string());
        event.location = Some("New York Marriott".to_string());
        let events = vec![event];
        let now = at(2024, 6, 1);

        for needle in ["earnings", "WEBCAST", "marriott", "acme", "ACME Inc", "semicond"] {
            let query = EventQuery {
                text: Some(needle.to_string()),
                ..Default::default()
            };
            assert_eq!(
                filter_events(&events, &query, now).len(),
                1,
                "'{}' should match",
                needle
            );
        }

        let query = EventQuery {
            text: Some("biotech".to_string()),
            ..Default::default()
        };
        assert!(filter_events(&events, &query, now).is_empty());
    }

    #[test]
    fn test_rsvp_only_keeps_accepted() {
        let mut accepted = make_event("e1", None);
        accepted.rsvp = RsvpStatus::Accepted;
        let declined = {
            let mut e = make_event("e2", None);
            e.rsvp = RsvpStatus::Declined;
            e
        };
        let events = vec![accepted, declined, make_event("e3", None)];

        let query = EventQuery {
            rsvp_only: true,
            ..Default::default()
        };
        let result = filter_events(&events, &query, at(2024, 6, 1));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "e1");
    }

    #[test]
    fn test_window_matches_at_day_granularity() {
        // Late in the evening of the window's last day still counts
        let events = vec![
            make_event("e1", Some("2024-03-31T23:59:00Z")),
            make_event("e2", Some("2024-04-01T00:00:00Z")),
            make_event("e3", None),
        ];

        let query = EventQuery {
            window: Some(resolve_date_range(ViewMode::Month, at(2024, 3, 15).date_naive())),
            ..Default::default()
        };
        let result = filter_events(&events, &query, at(2024, 3, 1));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "e1");
    }

    #[test]
    fn test_malformed_start_fails_closed() {
        let broken = make_event("e1", None);
        let events = vec![broken];
        let now = at(2024, 6, 1);

        for category in [EventCategory::Upcoming, EventCategory::Past] {
            let query = EventQuery {
                category,
                ..Default::default()
            };
            assert!(
                filter_events(&events, &query, now).is_empty(),
                "{:?} must exclude events without a start instant",
                category
            );
        }
    }

    #[test]
    fn test_sort_by_company_and_status_is_stable() {
        let mut a = make_event("e1", Some("2024-06-01T10:00:00Z"));
        a.companies = vec![make_company("c2", "ZETA")];
        let mut b = make_event("e2", Some("2024-06-02T10:00:00Z"));
        b.companies = vec![make_company("c3", "ACME")];
        let mut c = make_event("e3", Some("2024-06-03T10:00:00Z"));
        c.companies = vec![make_company("c4", "ACME")];
        let events = vec![a, b, c];

        let query = EventQuery {
            sort: SortKey::Company,
            ..Default::default()
        };
        let result = filter_events(&events, &query, at(2024, 6, 1));
        let ids: Vec<&str> = result.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            ["e2", "e3", "e1"],
            "Equal tickers must keep their input order"
        );
    }

    #[test]
    fn test_grouping_partitions_the_input() {
        let today = at(2024, 6, 10).date_naive();
        let events = vec![
            make_event("past", Some("2024-06-08T09:00:00Z")),
            make_event("today", Some("2024-06-10T09:00:00Z")),
            make_event("tomorrow", Some("2024-06-11T09:00:00Z")),
            make_event("week", Some("2024-06-16T09:00:00Z")),
            make_event("next", Some("2024-06-17T09:00:00Z")),
            make_event("later", Some("2024-06-24T09:00:00Z")),
        ];

        let grouped = group_by_bucket(&events, today);

        let total: usize = grouped.iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, events.len(), "Buckets must partition the input");

        let buckets: Vec<DateBucket> = grouped.iter().map(|(b, _)| *b).collect();
        assert_eq!(
            buckets,
            [
                DateBucket::Earlier,
                DateBucket::Today,
                DateBucket::Tomorrow,
                DateBucket::ThisWeek,
                DateBucket::NextWeek,
                DateBucket::Later,
            ]
        );
    }

    #[test]
    fn test_day_seven_lands_in_next_week_not_this_week() {
        let today = at(2024, 6, 10).date_naive();
        // Day 6 is the last ThisWeek day; day 7 opens NextWeek; day 14 opens Later
        let events = vec![
            make_event("d6", Some("2024-06-16T09:00:00Z")),
            make_event("d7", Some("2024-06-17T09:00:00Z")),
            make_event("d13", Some("2024-06-23T09:00:00Z")),
            make_event("d14", Some("2024-06-24T09:00:00Z")),
        ];

        let grouped = group_by_bucket(&events, today);

        let find = |bucket: DateBucket| -> Vec<&str> {
            grouped
                .iter()
                .find(|(b, _)| *b == bucket)
                .map(|(_, members)| members.iter().map(|e| e.id.as_str()).collect())
                .unwrap_or_default()
        };

        assert_eq!(find(DateBucket::ThisWeek), ["d6"]);
        assert_eq!(find(DateBucket::NextWeek), ["d7", "d13"]);
        assert_eq!(find(DateBucket::Later), ["d14"]);
    }

    #[test]
    fn test_empty_buckets_are_omitted_and_members_sorted() {
        let today = at(2024, 6, 10).date_naive();
        let events = vec![
            make_event("late", Some("2024-06-10T16:00:00Z")),
            make_event("early", Some("2024-06-10T08:00:00Z")),
        ];

        let grouped = group_by_bucket(&events, today);

        assert_eq!(grouped.len(), 1, "Only the Today bucket should be present");
        let (bucket, members) = &grouped[0];
        assert_eq!(*bucket, DateBucket::Today);
        let ids: Vec<&str> = members.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["early", "late"], "Within-bucket order is by start");
    }

    #[test]
    fn test_grouping_skips_events_without_start() {
        let today = at(2024, 6, 10).date_naive();
        let events = vec![make_event("e1", None)];
        assert!(group_by_bucket(&events, today).is_empty());
    }
}
