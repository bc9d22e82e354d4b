//! Error types for the lookup engine.

use thiserror::Error;

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Coarse classification of a [`SearchError`].
///
/// Callers that only care about how to react (retry, degrade, report
/// "not found") match on this instead of the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, bad status or timeout at any fetch call.
    FetchFailed,
    /// Markup did not have the shape an extraction rule expects.
    ParseFailed,
    /// No cover rule matched the detail page.
    NoCoverFound,
    /// No candidate survived filtering and selection.
    NoResult,
    /// Bad input or configuration.
    Invalid,
}

/// Errors that can occur while resolving a code.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// A fetch exceeded its deadline.
    #[error("Timed out fetching {0}")]
    Timeout(String),

    /// Failed to parse a page.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// No cover rule matched the detail page.
    #[error("No cover image found on {0}")]
    NoCoverFound(String),

    /// Nothing usable came back for the code.
    #[error("No result for '{0}'")]
    NoResult(String),

    /// Every dispatched source failed.
    #[error("All sources unreachable")]
    AllSourcesFailed,

    /// The input did not contain a usable code.
    #[error("Invalid code: {0}")]
    InvalidCode(String),

    /// Configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Image decode/encode failed.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Cover pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl SearchError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Status { .. } | Self::Timeout(_) | Self::AllSourcesFailed => {
                ErrorKind::FetchFailed
            }
            Self::Parse(_) | Self::UrlParse(_) | Self::Image(_) => ErrorKind::ParseFailed,
            Self::NoCoverFound(_) => ErrorKind::NoCoverFound,
            Self::NoResult(_) => ErrorKind::NoResult,
            Self::InvalidCode(_) | Self::Config(_) | Self::Regex(_) | Self::Other(_) => {
                ErrorKind::Invalid
            }
        }
    }
}
