//! # search-that
//!
//! An embeddable catalog-code lookup engine.
//!
//! Given a code such as `ABC-123`, this library queries a configurable set of
//! media catalog sites, picks the best matching listing and returns its cover
//! image with a pixelation filter applied. It provides:
//!
//! - Concurrent fan-out with a per-source timeout
//! - Two source pools with configurable precedence
//! - Keyword filtering of junk listings
//! - Regex driven cover extraction and a block-average mosaic
//!
//! ## Example
//!
//! ```rust,no_run
//! use search_that::{Config, Resolver, ResponseStatus};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_json_str(r#"{
//!         "censored_engines": ["https://jable.tv/search/%s/"],
//!         "cover_regexes": ["jable.tv|<meta property=\"og:image\" content=\"([^\"]+)\""]
//!     }"#)?;
//!     let resolver = Resolver::new(config)?;
//!
//!     let response = resolver.resolve_text("what is abc-123?").await;
//!     if response.status == ResponseStatus::Ok {
//!         println!("{}", response.message);
//!     }
//!     Ok(())
//! }
//! ```

mod candidate;
mod code;
mod config;
mod error;
mod filter;
mod resolver;
mod response;
mod selector;
mod source;

pub mod cover;
pub mod fetcher;
pub mod fetcher_http;
pub mod mosaic;
pub mod proxy;
pub mod search;
pub mod sources;

pub use candidate::{Candidate, CandidateTag, SelectionOutcome};
pub use code::extract_code;
pub use config::{Config, SearchMode};
pub use cover::{CoverResolver, CoverRule};
pub use error::{ErrorKind, Result, SearchError};
pub use filter::filter_candidates;
pub use resolver::Resolver;
pub use response::{compose, Response, ResponseStatus};
pub use search::{FanOut, FanOutReport, SourceOutcome};
pub use selector::{preferred_pool, select};
pub use source::{Pool, QueryTemplate, Source, SourceClient, SourceKind, SourceRegistry};
