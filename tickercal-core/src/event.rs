//! Provider-neutral event types.
//!
//! These types represent corporate events in a source-agnostic way.
//! Data sources convert their payloads into these types, and the query
//! and rendering layers work exclusively with them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::company::Company;

/// A corporate event (earnings call, conference, regulatory event)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Display text for where the event takes place
    #[serde(default)]
    pub location: Option<String>,

    /// Start instant. A timestamp the source could not produce cleanly
    /// deserializes to None and is excluded from date-based matching.
    #[serde(default, with = "lenient_datetime")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_datetime")]
    pub end: Option<DateTime<Utc>>,

    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub location_type: LocationType,

    /// Companies attending or featured in this event
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Who is presenting the event (zero or more organizer records)
    #[serde(default)]
    pub hosts: Vec<Host>,

    /// The user's own response to this event
    #[serde(default)]
    pub rsvp: RsvpStatus,
}

impl Event {
    pub fn is_multi_company(&self) -> bool {
        self.companies.len() > 1
    }

    /// Id set of the companies attached to this event.
    pub fn attending_company_ids(&self) -> HashSet<&str> {
        self.companies.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn includes_company(&self, company_id: &str) -> bool {
        self.companies.iter().any(|c| c.id == company_id)
    }

    /// Whether any host entry resolves to the given company.
    /// Every entry is checked, not just the first.
    pub fn hosted_by(&self, company_id: &str) -> bool {
        self.hosts.iter().any(|h| h.is_company(company_id))
    }

    pub fn has_host_type(&self, host_type: HostType) -> bool {
        self.hosts.iter().any(|h| h.host_type() == host_type)
    }

    /// Calendar date of the start instant (UTC), used for day-granularity
    /// matching and bucketing. None when the timestamp was malformed.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|dt| dt.date_naive())
    }

    /// The first attached company, used for company-keyed sorting.
    pub fn primary_company(&self) -> Option<&Company> {
        self.companies.first()
    }
}

/// Who is presenting an event.
///
/// The wire shape is tagged by `host_type`; a multi-company host carries
/// its own company stubs rather than references into `companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "host_type", rename_all = "snake_case")]
pub enum Host {
    SingleCorp { host_id: String },
    MultiCorp { companies: Vec<CompanyStub> },
    NonCompany { organizer: String },
}

impl Host {
    /// Whether this host entry resolves to the given company.
    pub fn is_company(&self, company_id: &str) -> bool {
        match self {
            Host::SingleCorp { host_id } => host_id == company_id,
            Host::MultiCorp { companies } => companies.iter().any(|c| c.id == company_id),
            Host::NonCompany { .. } => false,
        }
    }

    pub fn host_type(&self) -> HostType {
        match self {
            Host::SingleCorp { .. } => HostType::SingleCorp,
            Host::MultiCorp { .. } => HostType::MultiCorp,
            Host::NonCompany { .. } => HostType::NonCompany,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostType {
    SingleCorp,
    MultiCorp,
    NonCompany,
}

/// A minimal company reference carried inside a multi-company host record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStub {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Standard,
    Catalyst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    #[default]
    Physical,
    Virtual,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Accepted,
    Declined,
    #[default]
    Pending,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Accepted => "accepted",
            RsvpStatus::Declined => "declined",
            RsvpStatus::Pending => "pending",
        }
    }

    /// Display color for this status.
    pub fn color(&self) -> RsvpColor {
        match self {
            RsvpStatus::Accepted => RsvpColor::Green,
            RsvpStatus::Declined => RsvpColor::Yellow,
            RsvpStatus::Pending => RsvpColor::Grey,
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" => Ok(RsvpStatus::Accepted),
            "declined" => Ok(RsvpStatus::Declined),
            "pending" => Ok(RsvpStatus::Pending),
            other => Err(format!(
                "Unknown RSVP status '{}'. Expected accepted, declined or pending",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpColor {
    Green,
    Yellow,
    Grey,
}

/// Lenient RFC 3339 timestamp (de)serialization.
///
/// Sources occasionally hand back timestamps that do not parse. Those
/// become None instead of failing the whole payload, and the query layer
/// treats them as not matching any date criterion.
pub(crate) mod lenient_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        }))
    }
}
