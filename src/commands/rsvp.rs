use anyhow::Result;
use owo_colors::OwoColorize;
use tickercal_core::config::GlobalConfig;
use tickercal_core::dashboard::Dashboard;
use tickercal_core::error::TickerCalError;
use tickercal_core::event::RsvpStatus;

use crate::utils::tui::create_spinner;

pub async fn run(config: &GlobalConfig, event_id: &str, status: &str) -> Result<()> {
    let status: RsvpStatus = status.parse().map_err(anyhow::Error::msg)?;

    let source = config.source()?;
    let spinner = create_spinner("Loading events".to_string());
    let mut dashboard = Dashboard::load(source.as_ref()).await;
    spinner.finish_and_clear();

    match dashboard.apply_rsvp(source.as_ref(), event_id, status).await {
        Ok(()) => {
            let title = dashboard
                .events()
                .iter()
                .find(|e| e.id == event_id)
                .map(|e| e.title.clone())
                .unwrap_or_else(|| event_id.to_string());
            println!("{} {} for {}", "Recorded".green(), status.bold(), title);
        }
        Err(TickerCalError::EventNotFound(_)) => {
            anyhow::bail!("Event '{}' not found", event_id);
        }
        Err(e) => {
            // Non-fatal: the write failed and the snapshot was refetched
            println!(
                "{} RSVP write failed ({}). Current state was refetched.",
                "!".yellow(),
                e
            );
        }
    }

    Ok(())
}
