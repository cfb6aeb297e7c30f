pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rhino")]
#[command(about = "Aggregate cloud and data-engineering news, events and courses", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of sources fetched concurrently (overrides the config file)
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured listings and their sources
    Listings,
    /// Aggregate a listing and print its items
    Fetch {
        /// Name of the listing (e.g. news, meetups, webinars)
        listing: String,

        /// Print items as JSON
        #[arg(long)]
        json: bool,

        /// Print at most this many items
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Look up the preview image of a page
    Image {
        /// URL of the page
        url: String,
    },
    /// Normalize a date string against the current time
    Date {
        /// Raw date text, e.g. "2 weeks ago" or "March 5, 2024"
        raw: String,
    },
    /// Scan analyst feeds for cloud market shares
    Market {
        /// Listing whose sources are scanned
        #[arg(short, long, default_value = "market")]
        listing: String,
    },
}
