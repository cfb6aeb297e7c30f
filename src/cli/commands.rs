use chrono::Utc;

use crate::app::{AppContext, Result};
use crate::domain::ContentItem;
use crate::market;
use crate::normalizer::normalize_date;

pub fn list_listings(ctx: &AppContext) -> Result<()> {
    if ctx.config.listings.is_empty() {
        println!("No listings");
        return Ok(());
    }

    for listing in &ctx.config.listings {
        println!("{} ({} sources, {:?})", listing.name, listing.sources.len(), listing.order);
        for source in &listing.sources {
            println!(
                "  {:<24} {:<7} {:<9} {}",
                source.name,
                format!("{:?}", source.kind).to_lowercase(),
                source.recency.to_string(),
                source.url
            );
        }
    }

    Ok(())
}

pub async fn fetch_listing(
    ctx: &AppContext,
    name: &str,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut items = ctx.aggregate_listing(name).await?;
    if let Some(limit) = limit {
        items.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    for item in &items {
        print_item(item);
    }
    println!("\n{} items", items.len());

    Ok(())
}

fn print_item(item: &ContentItem) {
    let date = item
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());

    println!("{} [{}] {}", date, item.source_name, item.title);
    println!("  {}", item.link);
    if !item.summary.is_empty() {
        println!("  {}", item.summary);
    }
    println!("  image: {}", item.image);
}

pub async fn resolve_image(ctx: &AppContext, url: &str) -> Result<()> {
    match ctx.aggregator.images().resolve(url).await {
        Some(image) => println!("{}", image),
        None => println!("No preview image found for {}", url),
    }
    Ok(())
}

pub fn parse_date(raw: &str) -> Result<()> {
    match normalize_date(raw, Utc::now()) {
        Some(date) => println!("{}", date.to_rfc3339()),
        None => println!("Could not parse date: {}", raw),
    }
    Ok(())
}

pub async fn scan_market(ctx: &AppContext, name: &str) -> Result<()> {
    let listing = ctx.listing(name)?;
    let records = market::scan(&ctx.aggregator, &listing.sources, Utc::now()).await;

    if records.is_empty() {
        println!("No market share figures found");
        return Ok(());
    }

    for record in &records {
        println!(
            "{} {:<8} {:>6.1}%  ({}, reported {})",
            record.year, record.provider, record.market_share, record.country, record.reported
        );
    }

    Ok(())
}
