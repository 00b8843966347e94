use anyhow::Result;
use owo_colors::OwoColorize;
use tickercal_core::config::GlobalConfig;
use tickercal_core::dashboard::Dashboard;
use tickercal_core::order::{CompanyOrder, LocalOrderStore};

use crate::render;
use crate::utils::tui::create_spinner;

pub async fn run(config: &GlobalConfig) -> Result<()> {
    let source = config.source()?;
    let spinner = create_spinner("Loading companies".to_string());
    let dashboard = Dashboard::load(source.as_ref()).await;
    spinner.finish_and_clear();

    if let Some(banner) = render::sample_data_banner(dashboard.origin()) {
        println!("{banner}\n");
    }

    let order = CompanyOrder::new(
        &config.user,
        LocalOrderStore::at(config.order_dir()?),
        config.remote_provider(),
    );
    let saved = order.load().await;
    let companies = dashboard.ordered_companies(saved.as_deref());

    if companies.is_empty() {
        println!("{}", "No subscribed companies".dimmed());
        return Ok(());
    }

    for (rank, company) in companies.iter().enumerate() {
        let sector = match (&company.sector, &company.subsector) {
            (Some(sector), Some(subsector)) => format!("{} / {}", sector, subsector),
            (Some(sector), None) => sector.clone(),
            (None, Some(subsector)) => subsector.clone(),
            (None, None) => String::new(),
        };
        let count = dashboard.event_count(&company.id);

        println!(
            "{:>3}. {} {:<28} {} {}",
            rank + 1,
            format!("{:<6}", company.ticker).bold(),
            company.name,
            format!("{:<34}", sector).dimmed(),
            format!("{} events", count).dimmed()
        );
    }

    Ok(())
}
