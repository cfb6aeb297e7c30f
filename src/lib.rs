//! # Data Rhino
//!
//! Content aggregation core for a cloud and data-engineering portal: vendor
//! blogs, industry news, project updates, meetups, webinars and courses.
//!
//! ## Architecture
//!
//! Every listing runs the same pipeline:
//!
//! ```text
//! Fetcher → Normalizer / Scraper / REST → Date → Recency → Image → Aggregator
//! ```
//!
//! - [`fetcher`]: HTTP transport behind an injectable trait
//! - [`normalizer`]: RSS/Atom/JSON Feed and JSON API entries to raw entries
//! - [`scrape`]: Selector-driven extraction from HTML listing pages
//! - [`aggregator`]: Concurrent per-source collection, dedup and ordering
//!
//! ## Quick Start
//!
//! ```bash
//! # Show configured listings
//! rhino listings
//!
//! # Aggregate the news listing as JSON
//! rhino fetch news --json
//!
//! # Upcoming meetups
//! rhino fetch meetups --limit 5
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: Configuration and the built-in source registry
//! - [`domain`]: Core models (ContentItem, SourceSpec, Listing)
//! - [`recency`]: Recency windows and cutoffs
//! - [`image`]: Preview-image lookup
//! - [`market`]: Cloud market-share extraction

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// fetcher and aggregator.
pub mod app;

/// Command-line interface using clap.
///
/// - `listings` - Show listings and their sources
/// - `fetch <listing>` - Aggregate a listing
/// - `image <url>` - Resolve a page's preview image
/// - `date <raw>` - Normalize a date string
/// - `market` - Scan analyst feeds for market shares
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/data-rhino/config.toml`, falling back to the
/// registry compiled into the binary.
pub mod config;

/// Core domain models.
///
/// - [`ContentItem`](domain::ContentItem): One normalized, renderable entry
/// - [`SourceSpec`](domain::SourceSpec): A registry entry describing a source
/// - [`Listing`](domain::Listing): A named group of sources
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for fetching a URL
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, JSON Feed 1.0 and configured
/// JSON APIs into [`RawEntry`](normalizer::RawEntry) values, and parses the
/// date formats those sources use.
pub mod normalizer;

/// HTML listing-page scraping driven by per-provider CSS selector rules.
pub mod scrape;

/// Open Graph / Twitter-card image lookup.
pub mod image;

/// Recency windows (`1y`, `6mo`, `2w`, `30d`, `upcoming`) and their cutoffs.
pub mod recency;

/// Concurrent aggregation of a listing's sources.
///
/// Sources run in parallel under a semaphore; a failing source yields no
/// items and never fails the whole listing.
pub mod aggregator;

/// Cloud market-share figures extracted from analyst feed headlines.
pub mod market;
