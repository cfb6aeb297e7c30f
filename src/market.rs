//! Cloud market-share extraction from analyst news feeds.
//!
//! Headlines such as "AWS holds 31% while Azure at 23.5 percent" are turned
//! into per-provider records. Nothing is persisted here; callers decide what
//! to do with the records.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::aggregator::Aggregator;
use crate::domain::SourceSpec;

static RE_SHARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(AWS|Amazon|Azure|Microsoft|Google|GCP|Alibaba|Oracle)[^\d]{0,15}(\d{1,3}(?:\.\d+)?)\s?(?:%|percent|pct)",
    )
    .expect("market share regex")
});

static RE_GROWTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)growth").expect("growth regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShare {
    pub provider: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShareRecord {
    pub year: i32,
    pub country: String,
    pub provider: String,
    pub market_share: f64,
    pub reported: NaiveDate,
}

/// Canonical provider name for a matched mention.
pub fn normalize_provider(raw: &str) -> String {
    let lower = raw.to_lowercase();

    if lower.contains("aws") || lower.contains("amazon") {
        "AWS".to_string()
    } else if lower.contains("azure") || lower.contains("microsoft") {
        "Azure".to_string()
    } else if lower.contains("google") || lower.contains("gcp") {
        "GCP".to_string()
    } else if lower.contains("alibaba") {
        "Alibaba".to_string()
    } else if lower.contains("oracle") {
        "Oracle".to_string()
    } else {
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// All share mentions in a piece of text.
///
/// Text that talks about growth is ignored entirely, since its percentages
/// are rates rather than shares. Values below 5 are read as fractions
/// (".31" means 31%).
pub fn extract_market_shares(text: &str) -> Vec<MarketShare> {
    if RE_GROWTH.is_match(text) {
        return Vec::new();
    }

    RE_SHARE
        .captures_iter(text)
        .filter_map(|caps| {
            let provider = normalize_provider(caps.get(1)?.as_str());
            let mut percent: f64 = caps.get(2)?.as_str().parse().ok()?;

            if percent < 5.0 {
                percent *= 100.0;
            }

            (percent > 0.0 && percent <= 100.0).then_some(MarketShare { provider, percent })
        })
        .collect()
}

/// Scan every source and return one record per provider for the current year.
pub async fn scan(
    aggregator: &Aggregator,
    sources: &[SourceSpec],
    now: DateTime<Utc>,
) -> Vec<MarketShareRecord> {
    let results = join_all(sources.iter().map(|source| aggregator.fetch_entries(source))).await;

    let year = now.year();
    let reported = now.date_naive();
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (source, result) in sources.iter().zip(results) {
        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Market source {} failed: {}", source.name, e);
                continue;
            }
        };

        for entry in entries {
            let text = format!(
                "{} {}",
                entry.title.unwrap_or_default(),
                entry.summary.unwrap_or_default()
            );

            for share in extract_market_shares(&text) {
                if !seen.insert((share.provider.clone(), year)) {
                    continue;
                }
                records.push(MarketShareRecord {
                    year,
                    country: "Global".to_string(),
                    provider: share.provider,
                    market_share: share.percent,
                    reported,
                });
            }
        }
    }

    tracing::info!("Extracted {} market share records", records.len());
    records
}
