use anyhow::Result;
use tickercal_core::config::GlobalConfig;
use tickercal_core::dashboard::Dashboard;
use tickercal_core::order::{move_company, CompanyOrder, LocalOrderStore};

use crate::utils::tui::create_spinner;

pub async fn run(config: &GlobalConfig, ticker: &str, to: usize) -> Result<()> {
    let source = config.source()?;
    let spinner = create_spinner("Loading companies".to_string());
    let dashboard = Dashboard::load(source.as_ref()).await;
    spinner.finish_and_clear();

    let company_id = super::resolve_company_id(&dashboard, ticker)?;

    let store = CompanyOrder::new(
        &config.user,
        LocalOrderStore::at(config.order_dir()?),
        config.remote_provider(),
    );
    let saved = store.load().await;

    // Start from the saved order applied over the subscription order, so
    // every current company has a slot before the move.
    let mut order: Vec<String> = dashboard
        .ordered_companies(saved.as_deref())
        .into_iter()
        .map(|c| c.id)
        .collect();

    move_company(&mut order, &company_id, to);
    store.save(&order).await?;

    for (rank, company) in dashboard
        .ordered_companies(Some(&order))
        .iter()
        .enumerate()
    {
        println!("{:>3}. {}", rank + 1, company.ticker);
    }

    Ok(())
}
