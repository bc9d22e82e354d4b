//! Locating and downloading the cover image of a detail page.
//!
//! Cover rules are tried in configured order; the first rule whose capture
//! group yields non-empty text decides the image URL. The order is the
//! user's ranking for pages that carry several candidate images.

use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::fetcher::{FetchRequest, FetchedPage, PageFetcher};
use crate::{Candidate, Result, SearchError};

fn default_group() -> usize {
    1
}

/// Serialized forms of a cover rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCoverRule {
    /// `"domain|regex"`, or a bare regex.
    Compact(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        domain: Option<String>,
        regex: String,
        #[serde(default = "default_group")]
        group: usize,
    },
}

/// A pattern whose capture group yields a cover image URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCoverRule", into = "RawCoverRule")]
pub struct CoverRule {
    domain: Option<String>,
    pattern: Regex,
    group: usize,
}

impl CoverRule {
    /// Creates a rule applying to every host, capturing group 1.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            domain: None,
            pattern: Regex::new(pattern)?,
            group: 1,
        })
    }

    /// Restricts the rule to detail pages on `domain`.
    pub fn for_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Uses another capture group.
    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Host this rule is restricted to, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the pattern source.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns whether the rule may run on a page served by `host`.
    pub fn applies_to(&self, host: &str) -> bool {
        self.domain
            .as_deref()
            .map_or(true, |d| d.eq_ignore_ascii_case(host))
    }

    /// Captured text of the first match, if non-empty.
    pub fn capture<'h>(&self, html: &'h str) -> Option<&'h str> {
        self.pattern
            .captures(html)
            .and_then(|caps| caps.get(self.group))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    }
}

fn is_host_like(s: &str) -> bool {
    !s.is_empty()
        && s.contains('.')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

impl TryFrom<RawCoverRule> for CoverRule {
    type Error = SearchError;

    fn try_from(raw: RawCoverRule) -> Result<Self> {
        match raw {
            RawCoverRule::Compact(text) => match text.split_once('|') {
                Some((domain, regex)) if is_host_like(domain) => {
                    Ok(Self::new(regex)?.for_domain(domain))
                }
                _ => Self::new(&text),
            },
            RawCoverRule::Detailed {
                domain,
                regex,
                group,
            } => {
                let rule = Self::new(&regex)?.with_group(group);
                Ok(match domain.filter(|d| !d.is_empty()) {
                    Some(domain) => rule.for_domain(domain),
                    None => rule,
                })
            }
        }
    }
}

impl From<CoverRule> for RawCoverRule {
    fn from(rule: CoverRule) -> Self {
        Self::Detailed {
            domain: rule.domain,
            regex: rule.pattern.as_str().to_string(),
            group: rule.group,
        }
    }
}

/// Applies `rules` in order to a detail page and returns the absolute
/// image URL from the first rule that captures something.
pub fn extract_cover_url(page_url: &Url, html: &str, rules: &[CoverRule]) -> Option<Url> {
    let host = page_url.host_str().unwrap_or_default();

    rules
        .iter()
        .filter(|rule| rule.applies_to(host))
        .find_map(|rule| {
            let captured = rule.capture(html)?;
            match page_url.join(captured) {
                Ok(url) => Some(url),
                Err(e) => {
                    debug!("Rule {} captured unusable URL {}: {}", rule.pattern(), captured, e);
                    None
                }
            }
        })
}

/// Fetches a candidate's detail page and its cover image.
pub struct CoverResolver {
    fetcher: Arc<dyn PageFetcher>,
    rules: Vec<CoverRule>,
    timeout: Duration,
}

impl CoverResolver {
    /// Creates a resolver; each fetch is bounded by `timeout`.
    pub fn new(fetcher: Arc<dyn PageFetcher>, rules: Vec<CoverRule>, timeout: Duration) -> Self {
        Self {
            fetcher,
            rules,
            timeout,
        }
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let request = FetchRequest::get(url, self.timeout);
        tokio::time::timeout(self.timeout, self.fetcher.fetch(&request))
            .await
            .map_err(|_| SearchError::Timeout(url.to_string()))?
    }

    /// Finds the cover URL of `candidate`'s detail page.
    pub async fn cover_url(&self, candidate: &Candidate) -> Result<Url> {
        let page = self.fetch(&candidate.link).await?;
        let page_url = Url::parse(&page.final_url)?;
        extract_cover_url(&page_url, &page.text(), &self.rules)
            .ok_or_else(|| SearchError::NoCoverFound(candidate.link.clone()))
    }

    /// Finds and downloads the cover image of `candidate`.
    pub async fn resolve(&self, candidate: &Candidate) -> Result<Vec<u8>> {
        let cover_url = self.cover_url(candidate).await?;
        debug!("Cover for {}: {}", candidate.link, cover_url);
        let image = self.fetch(cover_url.as_str()).await?;
        Ok(image.body)
    }
}
