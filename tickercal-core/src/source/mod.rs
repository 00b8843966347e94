//! Pluggable event/company data sources.
//!
//! A [`DataSource`] hands back the full list of subscribed companies and
//! their events; everything downstream (filtering, grouping, rendering)
//! works on the resulting in-memory [`Snapshot`]. Two implementations
//! exist: a remote provider subprocess and the built-in fixture dataset.

pub mod fixture;
pub mod protocol;
pub mod provider;
pub mod remote;

use async_trait::async_trait;

use crate::company::Company;
use crate::error::TickerCalResult;
use crate::event::{Event, RsvpStatus};

/// Where a snapshot's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Remote,
    Fixture,
}

/// A loaded, immutable view of companies and their events.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub companies: Vec<Company>,
    pub events: Vec<Event>,
    pub origin: DataOrigin,
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &str;
    fn origin(&self) -> DataOrigin;
    async fn fetch_companies(&self) -> TickerCalResult<Vec<Company>>;
    async fn fetch_events(&self) -> TickerCalResult<Vec<Event>>;
    async fn set_rsvp(&self, event_id: &str, status: RsvpStatus) -> TickerCalResult<()>;
}

/// Fetch companies and events as one snapshot.
/// Nothing is returned until both lists have loaded.
pub async fn load_snapshot(source: &dyn DataSource) -> TickerCalResult<Snapshot> {
    let companies = source.fetch_companies().await?;
    let events = source.fetch_events().await?;
    Ok(Snapshot {
        companies,
        events,
        origin: source.origin(),
    })
}

/// Load from `source`, substituting the built-in sample dataset when it
/// fails. The snapshot's origin tells the UI to show the sample-data
/// banner instead of an error state.
pub async fn load_with_fallback(source: &dyn DataSource) -> Snapshot {
    match load_snapshot(source).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(
                source = source.name(),
                error = %e,
                "Data source unavailable, falling back to sample data"
            );
            fixture::FixtureSource::snapshot()
        }
    }
}
