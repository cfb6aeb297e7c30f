use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use data_rhino::app::AppContext;
use data_rhino::cli::{commands, Cli, Commands};
use data_rhino::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let ctx = match cli.workers {
        Some(workers) => AppContext::with_workers(config, workers)?,
        None => AppContext::new(config)?,
    };

    match cli.command {
        Commands::Listings => {
            commands::list_listings(&ctx)?;
        }
        Commands::Fetch {
            listing,
            json,
            limit,
        } => {
            commands::fetch_listing(&ctx, &listing, json, limit).await?;
        }
        Commands::Image { url } => {
            commands::resolve_image(&ctx, &url).await?;
        }
        Commands::Date { raw } => {
            commands::parse_date(&raw)?;
        }
        Commands::Market { listing } => {
            commands::scan_market(&ctx, &listing).await?;
        }
    }

    Ok(())
}
