//! Lookup orchestration: code in, [`Response`] out.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::mosaic::{self, EncodedImage};
use crate::search::{FanOut, FanOutReport};
use crate::sources::HttpSourceClient;
use crate::{
    compose, extract_code, filter_candidates, select, Candidate, Config, CoverResolver, Pool,
    Response, Result, SearchError, SearchMode, SelectionOutcome, Source, SourceClient,
    SourceRegistry,
};

/// Candidates a pool contributed, and whether any of its sources answered.
struct PoolHarvest {
    candidates: Vec<Candidate>,
    answered: bool,
}

/// Turns a pool's fan-out result into candidates, recording failures.
fn harvest(
    sources: &[Source],
    report: Result<FanOutReport>,
    failed: &mut Vec<String>,
) -> PoolHarvest {
    match report {
        Ok(report) => {
            failed.extend(report.failed_sources());
            let answered = report.outcomes().iter().any(|o| o.is_ok());
            PoolHarvest {
                candidates: report.into_candidates(),
                answered,
            }
        }
        Err(e) => {
            debug!("Pool search failed: {}", e);
            failed.extend(sources.iter().map(|s| s.name.clone()));
            PoolHarvest {
                candidates: Vec::new(),
                answered: false,
            }
        }
    }
}

/// Resolves codes against a fixed configuration snapshot.
pub struct Resolver {
    config: Config,
    registry: SourceRegistry,
    fan_out: FanOut,
    covers: CoverResolver,
}

impl Resolver {
    /// Creates a resolver talking HTTP through the configured proxy.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let proxy = config.proxy_config()?;
        let fetcher = HttpFetcher::with_options(&config.user_agent, proxy.as_ref())?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Creates a resolver on top of a custom network boundary.
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let client = Arc::new(HttpSourceClient::new(
            Arc::clone(&fetcher),
            config.timeout_duration(),
        ));
        Self::with_clients(config, client, fetcher)
    }

    /// Creates a resolver with a custom source client; `fetcher` is used
    /// for detail pages and images.
    pub fn with_clients(
        config: Config,
        client: Arc<dyn SourceClient>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        let registry = config.registry()?;
        let timeout = config.timeout_duration();
        Ok(Self {
            fan_out: FanOut::new(client, timeout),
            covers: CoverResolver::new(fetcher, config.cover_regexes.clone(), timeout),
            registry,
            config,
        })
    }

    /// The configuration snapshot in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The parsed sources.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    async fn search_pool(&self, pool: Pool, enabled: bool, code: &str) -> Result<FanOutReport> {
        if !enabled {
            return Ok(FanOutReport::default());
        }
        self.fan_out.fetch_all(self.registry.sources(pool), code).await
    }

    /// Queries the pools the search mode asks for, filters and selects.
    ///
    /// Fails with [`SearchError::AllSourcesFailed`] when sources were
    /// dispatched and none answered.
    pub async fn lookup(&self, code: &str) -> Result<SelectionOutcome> {
        let (query_a, query_b) = match self.config.search_mode {
            SearchMode::All => (true, true),
            SearchMode::PoolAOnly => (true, false),
            SearchMode::PoolBOnly => (false, true),
        };

        let (report_a, report_b) = tokio::join!(
            self.search_pool(Pool::A, query_a, code),
            self.search_pool(Pool::B, query_b, code),
        );

        let mut failed = Vec::new();
        let pool_a = harvest(self.registry.sources(Pool::A), report_a, &mut failed);
        let pool_b = harvest(self.registry.sources(Pool::B), report_b, &mut failed);

        if !pool_a.answered && !pool_b.answered && !failed.is_empty() {
            return Err(SearchError::AllSourcesFailed);
        }

        let keywords = &self.config.error_keywords;
        let outcome = select(
            filter_candidates(pool_a.candidates, keywords),
            filter_candidates(pool_b.candidates, keywords),
            self.config.search_mode,
            self.config.mosaic_reduce_first,
        );
        Ok(outcome.with_failures(failed))
    }

    /// Downloads and obfuscates the cover; `None` when either step fails.
    async fn cover_image(&self, candidate: &Candidate) -> Option<EncodedImage> {
        let raw = match self.covers.resolve(candidate).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cover for {} unavailable: {}", candidate.link, e);
                return None;
            }
        };

        let level = self.config.cover_mosaic_level;
        let transformed = tokio::task::spawn_blocking(move || mosaic::apply(&raw, level)).await;
        match transformed {
            Ok(Ok(image)) => Some(image),
            Ok(Err(e)) => {
                warn!("Mosaic failed for {}: {}", candidate.link, e);
                None
            }
            Err(e) => {
                warn!("Mosaic task for {} aborted: {}", candidate.link, e);
                None
            }
        }
    }

    /// Resolves a code that was already extracted from the user's text.
    pub async fn resolve(&self, code: &str) -> Response {
        let code = code.trim();
        if code.is_empty() {
            return Response::invalid_input(code);
        }

        let outcome = match self.lookup(code).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Lookup for {} failed: {}", code, e);
                return Response::unreachable(code);
            }
        };

        let image = match outcome.candidate() {
            Some(candidate) => {
                info!("Selected {} from {} for {}", candidate.link, candidate.source, code);
                self.cover_image(candidate).await
            }
            None => {
                info!("No result for {}", code);
                None
            }
        };

        compose(code, &outcome, image, self.config.return_details)
    }

    /// Extracts a code from free text, then resolves it.
    pub async fn resolve_text(&self, text: &str) -> Response {
        match extract_code(text) {
            Some(code) => self.resolve(&code).await,
            None => Response::invalid_input(text.trim()),
        }
    }
}
