//! Remote data source backed by a provider subprocess.

use async_trait::async_trait;

use crate::company::Company;
use crate::error::TickerCalResult;
use crate::event::{Event, RsvpStatus};
use crate::source::protocol::{ListCompanies, ListEvents, SetRsvp};
use crate::source::provider::Provider;
use crate::source::{DataOrigin, DataSource};

pub struct RemoteSource {
    provider: Provider,
}

impl RemoteSource {
    pub fn new(provider: Provider) -> Self {
        RemoteSource { provider }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    async fn fetch_companies(&self) -> TickerCalResult<Vec<Company>> {
        self.provider.call(ListCompanies).await
    }

    async fn fetch_events(&self) -> TickerCalResult<Vec<Event>> {
        self.provider.call(ListEvents).await
    }

    async fn set_rsvp(&self, event_id: &str, status: RsvpStatus) -> TickerCalResult<()> {
        self.provider
            .call(SetRsvp {
                event_id: event_id.to_string(),
                status,
            })
            .await
    }
}
