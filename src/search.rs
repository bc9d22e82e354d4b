//! Concurrent fan-out across sources.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::{Candidate, Result, SearchError, Source, SourceClient};

/// What one source produced for one query.
#[derive(Debug)]
pub struct SourceOutcome {
    /// Source name.
    pub source: String,
    /// Candidates, or why the source failed.
    pub result: Result<Vec<Candidate>>,
}

impl SourceOutcome {
    /// Returns whether the source answered.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-source outcomes in configured source order.
#[derive(Debug, Default)]
pub struct FanOutReport {
    outcomes: Vec<SourceOutcome>,
    duration_ms: u64,
}

impl FanOutReport {
    /// Outcomes in configured source order.
    pub fn outcomes(&self) -> &[SourceOutcome] {
        &self.outcomes
    }

    /// Looks up the outcome of a source by name.
    pub fn get(&self, source: &str) -> Option<&SourceOutcome> {
        self.outcomes.iter().find(|o| o.source == source)
    }

    /// Names of sources that failed or timed out.
    pub fn failed_sources(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.source.clone())
            .collect()
    }

    /// All candidates, flattened in configured source order.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .flatten()
            .collect()
    }

    /// Wall-clock time the fan-out took.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Dispatches one query per source concurrently, each under its own
/// deadline.
pub struct FanOut {
    client: Arc<dyn SourceClient>,
    timeout: Duration,
}

impl FanOut {
    /// Creates a fan-out where each source call is bounded by `timeout`.
    pub fn new(client: Arc<dyn SourceClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Queries every source and waits for all of them to settle.
    ///
    /// A failing or slow source only contributes an error entry for
    /// itself. The call fails with [`SearchError::AllSourcesFailed`] only
    /// when sources were dispatched and none of them answered.
    pub async fn fetch_all(&self, sources: &[Source], code: &str) -> Result<FanOutReport> {
        if sources.is_empty() {
            return Ok(FanOutReport::default());
        }

        let start = Instant::now();
        debug!("Querying {} sources for {}", sources.len(), code);

        let futures: Vec<_> = sources
            .iter()
            .map(|source| {
                let client = Arc::clone(&self.client);
                let timeout_duration = self.timeout;

                async move {
                    let name = source.name.clone();
                    let result = match timeout(timeout_duration, client.query(source, code)).await {
                        Ok(Ok(candidates)) => {
                            debug!("Source {} returned {} candidates", name, candidates.len());
                            Ok(candidates)
                        }
                        Ok(Err(e)) => {
                            warn!("Source {} failed: {}", name, e);
                            Err(e)
                        }
                        Err(_) => {
                            warn!("Source {} timed out", name);
                            Err(SearchError::Timeout(name.clone()))
                        }
                    };
                    SourceOutcome { source: name, result }
                }
            })
            .collect();

        // join_all keeps input order, so outcomes follow the configured
        // source order whatever the completion order was.
        let outcomes = join_all(futures).await;

        if outcomes.iter().all(|o| !o.is_ok()) {
            warn!("All {} sources failed for {}", outcomes.len(), code);
            return Err(SearchError::AllSourcesFailed);
        }

        Ok(FanOutReport {
            outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
