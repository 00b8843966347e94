//! Built-in sample dataset.
//!
//! Used as the configured source for trying tickercal out, and as the
//! substitute dataset when the live source is unavailable: the calendar
//! always has something to show.

use async_trait::async_trait;
use serde::Deserialize;

use crate::company::Company;
use crate::error::TickerCalResult;
use crate::event::{Event, RsvpStatus};
use crate::source::{DataOrigin, DataSource, Snapshot};

/// Sample companies and events embedded at compile time.
const FIXTURE_JSON: &str = include_str!("fixture_data.json");

#[derive(Debug, Deserialize)]
struct FixtureData {
    companies: Vec<Company>,
    events: Vec<Event>,
}

pub struct FixtureSource;

impl FixtureSource {
    fn data() -> FixtureData {
        // Unwrap safe: the dataset is embedded at compile time and covered by tests
        serde_json::from_str(FIXTURE_JSON).unwrap()
    }

    /// The full sample dataset as a ready snapshot.
    pub fn snapshot() -> Snapshot {
        let data = Self::data();
        Snapshot {
            companies: data.companies,
            events: data.events,
            origin: DataOrigin::Fixture,
        }
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Fixture
    }

    async fn fetch_companies(&self) -> TickerCalResult<Vec<Company>> {
        Ok(Self::data().companies)
    }

    async fn fetch_events(&self) -> TickerCalResult<Vec<Event>> {
        Ok(Self::data().events)
    }

    /// Nowhere to record it; accepted so optimistic local state stands.
    async fn set_rsvp(&self, _event_id: &str, _status: RsvpStatus) -> TickerCalResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_data_parses() {
        let snapshot = FixtureSource::snapshot();
        assert!(!snapshot.companies.is_empty());
        assert!(!snapshot.events.is_empty());
        assert_eq!(snapshot.origin, DataOrigin::Fixture);
    }

    #[test]
    fn test_fixture_events_reference_known_companies() {
        let snapshot = FixtureSource::snapshot();
        let known: Vec<&str> = snapshot.companies.iter().map(|c| c.id.as_str()).collect();

        for event in &snapshot.events {
            assert!(
                !event.companies.is_empty(),
                "Event {} has no companies",
                event.id
            );
            for company in &event.companies {
                assert!(
                    known.contains(&company.id.as_str()),
                    "Event {} references unknown company {}",
                    event.id,
                    company.id
                );
            }
            assert!(
                event.start.is_some(),
                "Fixture event {} should have a parseable start",
                event.id
            );
        }
    }

    #[test]
    fn test_fixture_covers_every_host_shape() {
        use crate::event::HostType;

        let snapshot = FixtureSource::snapshot();
        for host_type in [
            HostType::SingleCorp,
            HostType::MultiCorp,
            HostType::NonCompany,
        ] {
            assert!(
                snapshot.events.iter().any(|e| e.has_host_type(host_type)),
                "No fixture event with host type {:?}",
                host_type
            );
        }
    }
}
