pub mod calendar;
pub mod companies;
pub mod events;
pub mod reorder;
pub mod rsvp;
pub mod watch;

use anyhow::Result;
use tickercal_core::dashboard::Dashboard;

/// Resolve a ticker to a company id, listing what is available on a miss.
pub fn resolve_company_id(dashboard: &Dashboard, ticker: &str) -> Result<String> {
    match dashboard.company_by_ticker(ticker) {
        Some(company) => Ok(company.id.clone()),
        None => {
            let available: Vec<&str> = dashboard
                .companies()
                .iter()
                .map(|c| c.ticker.as_str())
                .collect();
            anyhow::bail!(
                "Company '{}' not found. Available: {}",
                ticker,
                available.join(", ")
            );
        }
    }
}
