//! Listing extractors for the supported sites, and the HTTP source client.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::Selector;
use tracing::debug;
use url::Url;

use crate::fetcher::{FetchRequest, PageFetcher};
use crate::{Candidate, Pool, Result, SearchError, Source, SourceClient, SourceKind};

mod av123;
mod generic;
mod jable;
mod jav777;
mod jav_guru;
mod missav;
mod seven_mm;
mod supjav;

/// Maximum candidates kept from a single source.
pub const MAX_RESULTS_PER_SOURCE: usize = 5;

/// Per-query state shared by the extractors.
pub(crate) struct Listing<'a> {
    source: &'a Source,
    code: &'a str,
    code_lower: String,
    base: Url,
}

impl<'a> Listing<'a> {
    /// `page_url` is the URL the listing was served from, after redirects.
    pub(crate) fn new(source: &'a Source, code: &'a str, page_url: &str) -> Result<Self> {
        Ok(Self {
            source,
            code,
            code_lower: code.to_lowercase(),
            base: Url::parse(page_url)?,
        })
    }

    pub(crate) fn code(&self) -> &str {
        self.code
    }

    /// Case-insensitive check for the code.
    pub(crate) fn mentions_code(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.code_lower)
    }

    /// Resolves `href` against the listing page; `None` for links that
    /// cannot be joined, which extractors skip.
    pub(crate) fn resolve(&self, href: &str) -> Option<Url> {
        match self.base.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Skipping bad link '{}' on {}: {}", href, self.source.name, e);
                None
            }
        }
    }

    /// Tags are only meaningful for pool A listings.
    pub(crate) fn tags_apply(&self) -> bool {
        self.source.pool == Pool::A
    }

    pub(crate) fn candidate(&self, title: &str, link: impl Into<String>) -> Candidate {
        Candidate::new(title.trim(), link, self.source.name.clone(), self.source.pool)
    }
}

/// Compiles a CSS selector.
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("Failed to parse selector: {:?}", e)))
}

/// Drops repeated links and empty titles, keeping first occurrences.
pub(crate) fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| !c.title.is_empty() && seen.insert(c.link.clone()))
        .collect()
}

/// Extracts candidates from a single-step listing page.
pub(crate) fn extract(kind: SourceKind, html: &str, listing: &Listing<'_>) -> Result<Vec<Candidate>> {
    let candidates = match kind {
        SourceKind::SevenMm => seven_mm::parse(html, listing)?,
        SourceKind::Supjav => supjav::parse(html, listing)?,
        SourceKind::Missav => missav::parse(html, listing)?,
        SourceKind::Jable => jable::parse(html, listing)?,
        SourceKind::JavGuru => jav_guru::parse(html, listing)?,
        SourceKind::Av123 => av123::parse(html, listing)?,
        SourceKind::Jav777 => Vec::new(),
        SourceKind::Generic => generic::parse(html, listing)?,
    };
    Ok(dedup(candidates))
}

/// Queries sources over HTTP through a [`PageFetcher`].
pub struct HttpSourceClient {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
}

impl HttpSourceClient {
    /// Creates a client whose every request carries `timeout`.
    pub fn new(fetcher: Arc<dyn PageFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    async fn query_jav777(&self, listing: &Listing<'_>, html: &str) -> Result<Vec<Candidate>> {
        let Some(detail_url) = jav777::first_post_link(html, listing)? else {
            return Ok(Vec::new());
        };

        let page = self
            .fetcher
            .fetch(&FetchRequest::get(detail_url.clone(), self.timeout))
            .await?;

        if jav777::confirms_code(&page.text(), listing.code()) {
            Ok(vec![jav777::candidate(listing, detail_url)])
        } else {
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn query(&self, source: &Source, code: &str) -> Result<Vec<Candidate>> {
        let request = source.template.render(code, self.timeout);
        debug!("Querying {} ({})", source.name, request.url);

        let page = self.fetcher.fetch(&request).await?;
        let html = page.text();
        let listing = Listing::new(source, code, &page.final_url)?;

        let mut candidates = match source.kind {
            SourceKind::Jav777 => self.query_jav777(&listing, &html).await?,
            kind => extract(kind, &html, &listing)?,
        };
        candidates.truncate(MAX_RESULTS_PER_SOURCE);
        Ok(candidates)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a source of `pool` from a template.
    pub(crate) fn source(template: &str, pool: Pool) -> Source {
        Source::parse(template, pool).unwrap()
    }
}
