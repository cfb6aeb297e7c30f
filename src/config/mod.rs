//! Configuration and source registry.
//!
//! Configuration is read from `~/.config/data-rhino/config.toml` (or the
//! path given on the command line). If the default file doesn't exist, it is
//! created from the built-in registry, which is also used whenever a config
//! file declares no listings.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregator::{DEFAULT_IMAGE_CONCURRENCY, DEFAULT_WORKERS};
use crate::domain::{Listing, SourceSpec};

const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// HTTP client settings shared by every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("data-rhino/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub workers: usize,
    pub image_concurrency: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            image_concurrency: DEFAULT_IMAGE_CONCURRENCY,
        }
    }
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub aggregator: AggregatorConfig,
    #[serde(rename = "listing")]
    pub listings: Vec<Listing>,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing default file is created with
    /// the built-in registry.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Self::builtin();
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: config_path,
                source,
            },
            other => other,
        })
    }

    /// The registry shipped with the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;

        if config.listings.is_empty() {
            config.listings = Self::builtin()?.listings;
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/data-rhino/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("data-rhino").join("config.toml"))
    }

    pub fn listing(&self, name: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.name == name)
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceSpec> {
        self.listings.iter().flat_map(|l| l.sources.iter())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();

        for listing in &self.listings {
            if !names.insert(listing.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate listing name: {}",
                    listing.name
                )));
            }

            for source in &listing.sources {
                source.validate().map_err(|e| {
                    ConfigError::Invalid(format!(
                        "listing {}, source {}: {}",
                        listing.name, source.name, e
                    ))
                })?;
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.timeout_secs must be positive".into()));
        }

        Ok(())
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SortOrder, SourceKind};
    use crate::recency::RecencyWindow;
    use std::io::Write;

    #[test]
    fn test_builtin_registry_is_valid() {
        let config = Config::builtin().expect("Built-in registry should be valid");

        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.aggregator.workers, 10);
        for name in ["blogs", "news", "projects", "meetups", "webinars", "courses", "market"] {
            assert!(config.listing(name).is_some(), "missing listing {}", name);
        }
    }

    #[test]
    fn test_builtin_source_details() {
        let config = Config::builtin().unwrap();

        let meetups = config.listing("meetups").unwrap();
        assert_eq!(meetups.order, SortOrder::SoonestFirst);
        assert!(meetups
            .sources
            .iter()
            .all(|s| s.recency == RecencyWindow::Upcoming && s.placeholder == "/logos/meetup.png"));

        let projects = config.listing("projects").unwrap();
        let spark = projects.sources.iter().find(|s| s.name == "Spark").unwrap();
        assert_eq!(spark.kind, SourceKind::Scrape);
        assert_eq!(spark.recency, RecencyWindow::Months(6));
        let beam = projects.sources.iter().find(|s| s.name == "Beam").unwrap();
        assert_eq!(beam.kind, SourceKind::Feed);
        assert_eq!(beam.recency, RecencyWindow::Months(1));

        let news = config.listing("news").unwrap();
        assert!(news.sources.iter().all(|s| s.max_items == Some(3)));
    }

    #[test]
    fn test_partial_config_uses_builtin_listings() {
        let config = Config::from_toml(
            r#"
[http]
timeout_secs = 3
"#,
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 3);
        assert_eq!(config.http.user_agent, HttpConfig::default().user_agent);
        assert_eq!(config.aggregator, AggregatorConfig::default());
        assert!(config.listing("news").is_some());
    }

    #[test]
    fn test_custom_listing() {
        let config = Config::from_toml(
            r#"
[[listing]]
name = "mine"

[[listing.sources]]
name = "Blog"
url = "https://example.com/feed.xml"
recency = "2w"
"#,
        )
        .unwrap();

        assert_eq!(config.listings.len(), 1);
        let listing = config.listing("mine").unwrap();
        assert_eq!(listing.order, SortOrder::NewestFirst);
        assert_eq!(listing.sources[0].recency, RecencyWindow::Weeks(2));
        assert_eq!(config.sources().count(), 1);
    }

    #[test]
    fn test_scrape_without_rules_rejected() {
        let result = Config::from_toml(
            r#"
[[listing]]
name = "broken"

[[listing.sources]]
name = "Spark"
url = "https://spark.apache.org/news/"
kind = "scrape"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_listing_rejected() {
        let result = Config::from_toml(
            r#"
[[listing]]
name = "news"

[[listing]]
name = "news"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_recency_is_parse_error() {
        let result = Config::from_toml(
            r#"
[[listing]]
name = "news"

[[listing.sources]]
name = "Blog"
url = "https://example.com/feed.xml"
recency = "soon"
"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[aggregator]
workers = 2

[[listing]]
name = "solo"

[[listing.sources]]
name = "Blog"
url = "https://example.com/feed.xml"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.aggregator.workers, 2);
        assert_eq!(config.listings.len(), 1);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let result = Config::load(Some(path.as_path()));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
