//! Read-only configuration snapshot.
//!
//! The engine never mutates configuration; a caller loads a snapshot and
//! hands it to [`crate::Resolver`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::fetcher_http::DEFAULT_USER_AGENT;
use crate::proxy::ProxyConfig;
use crate::{CoverRule, Result, SearchError, SourceRegistry};

/// Which pools are queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMode {
    /// Both pools; precedence follows `mosaic_reduce_first`.
    #[default]
    #[serde(rename = "all", alias = "全部")]
    All,
    /// Pool A only.
    #[serde(rename = "pool_a", alias = "仅有码", alias = "censored")]
    PoolAOnly,
    /// Pool B only.
    #[serde(rename = "pool_b", alias = "仅无码", alias = "uncensored")]
    PoolBOnly,
}

impl FromStr for SearchMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "all" | "全部" => Ok(Self::All),
            "pool_a" | "a" | "censored" | "仅有码" => Ok(Self::PoolAOnly),
            "pool_b" | "b" | "uncensored" | "仅无码" => Ok(Self::PoolBOnly),
            other => Err(SearchError::Config(format!("Unknown search mode: {}", other))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::PoolAOnly => write!(f, "pool_a"),
            Self::PoolBOnly => write!(f, "pool_b"),
        }
    }
}

fn default_timeout() -> f64 {
    10.0
}

fn default_mosaic_level() -> u32 {
    3
}

fn default_return_details() -> bool {
    true
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Blank strings mean "no proxy".
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Configuration snapshot for one or more lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which pools to query.
    #[serde(default)]
    pub search_mode: SearchMode,
    /// Prefer pool B over pool A when both have results.
    #[serde(default)]
    pub mosaic_reduce_first: bool,
    /// Pool A query templates, in priority order.
    #[serde(default, alias = "censored_engines")]
    pub pool_a_sources: Vec<String>,
    /// Pool B query templates, in priority order.
    #[serde(default, alias = "uncensored_engines")]
    pub pool_b_sources: Vec<String>,
    /// Literal title fragments marking junk results.
    #[serde(default)]
    pub error_keywords: Vec<String>,
    /// Proxy URL applied to every request.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub proxy: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// Mosaic strength; 0 disables the transform.
    #[serde(default = "default_mosaic_level")]
    pub cover_mosaic_level: u32,
    /// Ordered cover extraction rules.
    #[serde(default)]
    pub cover_regexes: Vec<CoverRule>,
    /// Include title and link next to the image.
    #[serde(default = "default_return_details")]
    pub return_details: bool,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::All,
            mosaic_reduce_first: false,
            pool_a_sources: Vec::new(),
            pool_b_sources: Vec::new(),
            error_keywords: Vec::new(),
            proxy: None,
            timeout: default_timeout(),
            cover_mosaic_level: default_mosaic_level(),
            cover_regexes: Vec::new(),
            return_details: default_return_details(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SearchError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Checks that the snapshot is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(SearchError::Config(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout
            )));
        }
        self.proxy_config()?;
        self.registry()?;
        Ok(())
    }

    /// Per-request timeout.
    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout()))
    }

    /// Parsed proxy, if one is configured.
    pub fn proxy_config(&self) -> Result<Option<ProxyConfig>> {
        self.proxy.as_deref().map(ProxyConfig::parse).transpose()
    }

    /// Parses the configured source templates.
    pub fn registry(&self) -> Result<SourceRegistry> {
        SourceRegistry::from_templates(&self.pool_a_sources, &self.pool_b_sources)
    }
}
