//! Subscribed company ("ticker") types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// A trackable subscribed company.
///
/// Display order is not a field here: it is owned by the order store and
/// applied to the fetched list (default order = subscription order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub ticker: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub subsector: Option<String>,
}

impl Company {
    /// Number of events referencing this company.
    pub fn event_count(&self, events: &[Event]) -> usize {
        events.iter().filter(|e| e.includes_company(&self.id)).count()
    }
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ticker)
    }
}
