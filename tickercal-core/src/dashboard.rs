//! In-memory dashboard state.
//!
//! Owns the loaded snapshot and serializes mutations to it. The query
//! and rendering layers only ever see immutable views.

use crate::company::Company;
use crate::error::{TickerCalError, TickerCalResult};
use crate::event::{Event, RsvpStatus};
use crate::order::apply_order;
use crate::source::{load_with_fallback, DataOrigin, DataSource, Snapshot};

pub struct Dashboard {
    snapshot: Snapshot,
}

impl Dashboard {
    /// Load from the source, substituting sample data when it is
    /// unavailable.
    pub async fn load(source: &dyn DataSource) -> Dashboard {
        Dashboard {
            snapshot: load_with_fallback(source).await,
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Dashboard {
        Dashboard { snapshot }
    }

    pub fn companies(&self) -> &[Company] {
        &self.snapshot.companies
    }

    pub fn events(&self) -> &[Event] {
        &self.snapshot.events
    }

    pub fn origin(&self) -> DataOrigin {
        self.snapshot.origin
    }

    /// Replace the snapshot with a fresh fetch.
    pub async fn refresh(&mut self, source: &dyn DataSource) {
        self.snapshot = load_with_fallback(source).await;
    }

    /// Find a subscribed company by ticker, case-insensitively.
    pub fn company_by_ticker(&self, ticker: &str) -> Option<&Company> {
        self.snapshot
            .companies
            .iter()
            .find(|c| c.ticker.eq_ignore_ascii_case(ticker))
    }

    /// Number of events referencing a company.
    pub fn event_count(&self, company_id: &str) -> usize {
        self.snapshot
            .events
            .iter()
            .filter(|e| e.includes_company(company_id))
            .count()
    }

    /// Companies in display order: the saved order applied over the
    /// subscription order.
    pub fn ordered_companies(&self, order: Option<&[String]>) -> Vec<Company> {
        apply_order(self.snapshot.companies.clone(), order)
    }

    /// Record an RSVP. The local copy is updated immediately; when the
    /// external write fails the whole snapshot is refetched, so local
    /// state converges on whatever the source holds instead of silently
    /// keeping an unacknowledged response.
    pub async fn apply_rsvp(
        &mut self,
        source: &dyn DataSource,
        event_id: &str,
        status: RsvpStatus,
    ) -> TickerCalResult<()> {
        let event = self
            .snapshot
            .events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| TickerCalError::EventNotFound(event_id.to_string()))?;
        event.rsvp = status;

        if let Err(e) = source.set_rsvp(event_id, status).await {
            tracing::warn!(error = %e, "RSVP write failed, refetching");
            self.refresh(source).await;
            return Err(e);
        }

        Ok(())
    }
}
