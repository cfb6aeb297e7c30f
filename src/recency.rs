use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ContentItem;

/// Maximum age of an item for a given source.
///
/// Written in configuration as `"1y"`, `"6mo"`, `"2w"`, `"30d"` or
/// `"upcoming"`. `Upcoming` keeps only items dated now or later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecencyWindow {
    Years(u32),
    Months(u32),
    Weeks(u32),
    Days(u32),
    Upcoming,
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self::Years(1)
    }
}

impl RecencyWindow {
    /// Oldest timestamp an item may carry and still be kept.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let cutoff = match *self {
            Self::Years(n) => now.checked_sub_months(Months::new(n.saturating_mul(12))),
            Self::Months(n) => now.checked_sub_months(Months::new(n)),
            Self::Weeks(n) => now.checked_sub_signed(Duration::weeks(i64::from(n))),
            Self::Days(n) => now.checked_sub_signed(Duration::days(i64::from(n))),
            Self::Upcoming => Some(now),
        };
        cutoff.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        if s == "upcoming" {
            return Ok(Self::Upcoming);
        }

        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("Missing unit in recency window: {}", s))?;
        let (count, unit) = s.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| format!("Invalid count in recency window: {}", s))?;

        match unit {
            "y" => Ok(Self::Years(count)),
            "mo" => Ok(Self::Months(count)),
            "w" => Ok(Self::Weeks(count)),
            "d" => Ok(Self::Days(count)),
            other => Err(format!("Unknown recency unit: {}", other)),
        }
    }
}

impl TryFrom<String> for RecencyWindow {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecencyWindow> for String {
    fn from(window: RecencyWindow) -> Self {
        window.to_string()
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(n) => write!(f, "{}y", n),
            Self::Months(n) => write!(f, "{}mo", n),
            Self::Weeks(n) => write!(f, "{}w", n),
            Self::Days(n) => write!(f, "{}d", n),
            Self::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// Items without a parseable date are never kept.
pub fn keep_if_recent(item: &ContentItem, cutoff: DateTime<Utc>) -> bool {
    is_recent(item.published_at, cutoff)
}

pub(crate) fn is_recent(published_at: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    published_at.is_some_and(|at| at >= cutoff)
}
