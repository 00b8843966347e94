mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tickercal_core::config::GlobalConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tickercal")]
#[command(about = "Track corporate events across your subscribed tickers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events, filtered and grouped by date
    Events {
        /// Free text to search for; date-shaped input (e.g. "next friday")
        /// jumps the window to that date instead
        #[arg(short, long)]
        search: Option<String>,

        /// Only events for this ticker
        #[arg(short, long)]
        company: Option<String>,

        /// all, hosted, attended, upcoming, past, single_corp_host,
        /// multi_corp_host or non_company_host
        #[arg(long, default_value = "all")]
        category: String,

        /// Only events you have accepted
        #[arg(long)]
        rsvp_only: bool,

        /// date, company, subsector or status
        #[arg(long, default_value = "date")]
        sort: String,

        /// Restrict to a view window: week, month, 2month or 3month
        #[arg(short, long)]
        view: Option<String>,

        /// Anchor date (YYYY-MM-DD or a query like "next friday")
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show the calendar grid for a view window
    Calendar {
        /// week, month, 2month or 3month (defaults to config)
        #[arg(short, long)]
        view: Option<String>,

        /// Anchor date (YYYY-MM-DD or a query like "next friday")
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List subscribed companies in display order
    Companies,
    /// Record your response to an event
    Rsvp {
        event_id: String,

        /// accepted, declined or pending
        status: String,
    },
    /// Move a company within the display order
    Reorder {
        ticker: String,

        /// Zero-based position to move the company to
        #[arg(long)]
        to: usize,
    },
    /// Watch the provider change feed and refetch on updates
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GlobalConfig::load()?;

    match cli.command {
        Commands::Events {
            search,
            company,
            category,
            rsvp_only,
            sort,
            view,
            date,
        } => {
            commands::events::run(
                &config,
                commands::events::Options {
                    search,
                    company,
                    category,
                    rsvp_only,
                    sort,
                    view,
                    date,
                },
            )
            .await
        }
        Commands::Calendar { view, date } => commands::calendar::run(&config, view, date).await,
        Commands::Companies => commands::companies::run(&config).await,
        Commands::Rsvp { event_id, status } => {
            commands::rsvp::run(&config, &event_id, &status).await
        }
        Commands::Reorder { ticker, to } => commands::reorder::run(&config, &ticker, to).await,
        Commands::Watch => commands::watch::run(&config).await,
    }
}
