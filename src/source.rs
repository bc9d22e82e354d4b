//! Search sources: pools, query templates and the per-source client trait.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::fetcher::FetchRequest;
use crate::{Candidate, Result, SearchError};

/// Placeholder substituted by the code in query templates.
const CODE_PLACEHOLDER: &str = "%s";

/// Separator between the URL and a form body in a query template.
const POST_MARKER: &str = "#POST#";

/// One of the two independently configured source groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    /// Primary ("censored") sources.
    A,
    /// Alternate ("uncensored") sources.
    B,
}

impl Pool {
    /// The other pool.
    pub fn other(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Listing layout a source serves, chosen from its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    SevenMm,
    Supjav,
    Missav,
    Jable,
    JavGuru,
    Av123,
    Jav777,
    /// Any other host: anchors whose title or text mention the code.
    Generic,
}

impl SourceKind {
    /// Every kind with a dedicated extractor, with the host suffix it is
    /// recognised by.
    pub const KNOWN: [(SourceKind, &'static str); 7] = [
        (SourceKind::SevenMm, "7mmtv.sx"),
        (SourceKind::Supjav, "supjav.com"),
        (SourceKind::Missav, "missav.ai"),
        (SourceKind::Jable, "jable.tv"),
        (SourceKind::JavGuru, "jav.guru"),
        (SourceKind::Av123, "123av.com"),
        (SourceKind::Jav777, "jav777.xyz"),
    ];

    /// Picks the kind for a host; subdomains match their parent.
    pub fn from_host(host: &str) -> Self {
        let host = host.to_ascii_lowercase();
        Self::KNOWN
            .iter()
            .find(|(_, suffix)| host == *suffix || host.ends_with(&format!(".{}", suffix)))
            .map(|(kind, _)| *kind)
            .unwrap_or(Self::Generic)
    }
}

/// A query URL with `%s` standing for the code, optionally POSTed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    url: String,
    post_body: Option<String>,
}

impl QueryTemplate {
    /// Parses `url[#POST#body]`.
    pub fn parse(template: &str) -> Result<Self> {
        let template = template.trim();
        let (url, post_body) = match template.split_once(POST_MARKER) {
            Some((url, body)) => (url, Some(body.to_string())),
            None => (template, None),
        };

        url::Url::parse(&url.replace(CODE_PLACEHOLDER, "code"))?;

        Ok(Self {
            url: url.to_string(),
            post_body,
        })
    }

    /// Returns the raw URL template.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns whether the query is sent as a form POST.
    pub fn is_post(&self) -> bool {
        self.post_body.is_some()
    }

    /// Builds the request for `code`.
    pub fn render(&self, code: &str, timeout: Duration) -> FetchRequest {
        let encoded = urlencoding::encode(code);
        let url = self.url.replace(CODE_PLACEHOLDER, &encoded);
        match &self.post_body {
            Some(body) => FetchRequest::post_form(url, body.replace(CODE_PLACEHOLDER, &encoded), timeout),
            None => FetchRequest::get(url, timeout),
        }
    }
}

/// A configured search source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Host of the query URL, used as the source identity.
    pub name: String,
    /// Pool the source was configured in.
    pub pool: Pool,
    /// Extraction layout.
    pub kind: SourceKind,
    /// Query URL template.
    pub template: QueryTemplate,
}

impl Source {
    /// Parses a configured template string into a source of `pool`.
    pub fn parse(template: &str, pool: Pool) -> Result<Self> {
        let template = QueryTemplate::parse(template)?;
        let probe = url::Url::parse(&template.url().replace(CODE_PLACEHOLDER, "code"))?;
        let name = probe
            .host_str()
            .ok_or_else(|| SearchError::Config(format!("Source '{}' has no host", template.url())))?
            .to_string();

        Ok(Self {
            kind: SourceKind::from_host(&name),
            name,
            pool,
            template,
        })
    }
}

/// Sources of both pools, each in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRegistry {
    pool_a: Vec<Source>,
    pool_b: Vec<Source>,
}

impl SourceRegistry {
    /// Parses both template lists. Any malformed template is an error.
    ///
    /// A source is identified by its host, so a host may appear only once
    /// across both pools.
    pub fn from_templates(pool_a: &[String], pool_b: &[String]) -> Result<Self> {
        let parse_all = |templates: &[String], pool: Pool| -> Result<Vec<Source>> {
            templates
                .iter()
                .filter(|t| !t.trim().is_empty())
                .map(|t| Source::parse(t, pool))
                .collect()
        };

        let registry = Self {
            pool_a: parse_all(pool_a, Pool::A)?,
            pool_b: parse_all(pool_b, Pool::B)?,
        };

        let mut seen = HashSet::new();
        for source in registry.pool_a.iter().chain(&registry.pool_b) {
            if !seen.insert(source.name.as_str()) {
                return Err(SearchError::Config(format!(
                    "Source {} is configured more than once",
                    source.name
                )));
            }
        }

        Ok(registry)
    }

    /// Sources of a pool in configured order.
    pub fn sources(&self, pool: Pool) -> &[Source] {
        match pool {
            Pool::A => &self.pool_a,
            Pool::B => &self.pool_b,
        }
    }

    /// Total number of sources.
    pub fn len(&self) -> usize {
        self.pool_a.len() + self.pool_b.len()
    }

    /// Returns whether no source is configured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Queries one source for a code.
///
/// Returns an empty list when the page loads but lists nothing, and an
/// error when the page cannot be fetched or has an unexpected shape.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Runs the query for `code` against `source`.
    async fn query(&self, source: &Source, code: &str) -> Result<Vec<Candidate>>;
}
