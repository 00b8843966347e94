use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use tickercal_core::config::GlobalConfig;
use tickercal_core::dashboard::Dashboard;
use tickercal_core::source::protocol::ChangeNotice;
use tickercal_core::source::remote::RemoteSource;

pub async fn run(config: &GlobalConfig) -> Result<()> {
    let Some(provider) = config.remote_provider() else {
        anyhow::bail!(
            "watch requires data_source = \"remote\" and a provider in the config"
        );
    };
    let source = RemoteSource::new(provider.clone());

    let mut dashboard = Dashboard::load(&source).await;
    println!(
        "Watching '{}' for changes ({} companies, {} events)",
        provider.name(),
        dashboard.companies().len(),
        dashboard.events().len()
    );

    let mut feed = provider.subscribe().await?;
    while let Some(notice) = feed.next().await {
        // Notices carry no payload; every one triggers a full refetch
        dashboard.refresh(&source).await;

        let what = match notice {
            ChangeNotice::EventsChanged => "events changed",
            ChangeNotice::RsvpChanged => "rsvp changed",
        };
        println!(
            "{} {} ({} events)",
            Utc::now().format("%H:%M:%S").to_string().dimmed(),
            what,
            dashboard.events().len()
        );
    }

    println!("{}", "Change feed closed".dimmed());
    Ok(())
}
