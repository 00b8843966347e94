//! Defines the JSON protocol used for communication between tickercal
//! and data-source provider binaries over stdin/stdout.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::company::Company;
use crate::event::{Event, RsvpStatus};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

/// Commands that providers must implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListCompanies,
    ListEvents,
    SetRsvp,
    GetCompanyOrder,
    SaveCompanyOrder,
    Subscribe,
}

/// Request sent from tickercal to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider to tickercal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap()
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        serde_json::to_string(&Response::<()>::Error {
            error: msg.to_string(),
        })
        .unwrap()
    }
}

/// List the user's subscribed companies.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCompanies;

impl ProviderCommand for ListCompanies {
    type Response = Vec<Company>;
    fn command() -> Command {
        Command::ListCompanies
    }
}

/// List events for the subscribed companies.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents;

impl ProviderCommand for ListEvents {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Record the user's response to an event.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetRsvp {
    pub event_id: String,
    pub status: RsvpStatus,
}

impl ProviderCommand for SetRsvp {
    type Response = ();
    fn command() -> Command {
        Command::SetRsvp
    }
}

/// Read the persisted company display order for a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetCompanyOrder {
    pub user: String,
}

impl ProviderCommand for GetCompanyOrder {
    /// None when no order has been saved for this user.
    type Response = Option<Vec<String>>;
    fn command() -> Command {
        Command::GetCompanyOrder
    }
}

/// Persist the company display order for a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveCompanyOrder {
    pub user: String,
    pub order: Vec<String>,
}

impl ProviderCommand for SaveCompanyOrder {
    type Response = ();
    fn command() -> Command {
        Command::SaveCompanyOrder
    }
}

/// Open a change feed: the provider stays alive and writes one JSON
/// [`ChangeNotice`] per stdout line as things change upstream.
#[derive(Debug, Serialize, Deserialize)]
pub struct Subscribe;

/// A change pushed by a subscribed provider.
///
/// No delivery, ordering, or deduplication guarantees; consumers react
/// by refetching, not by patching state from the notice itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeNotice {
    EventsChanged,
    RsvpChanged,
}
