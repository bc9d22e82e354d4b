//! Network boundary: retrieving pages and images.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// HTTP method used for a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestMethod {
    /// Plain GET.
    #[default]
    Get,
    /// POST with an `application/x-www-form-urlencoded` body.
    PostForm(String),
}

/// A single outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL.
    pub url: String,
    /// Method and optional body.
    pub method: RequestMethod,
    /// Deadline for the whole request, body included.
    pub timeout: Duration,
}

impl FetchRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            timeout,
        }
    }

    /// Creates a form POST request.
    pub fn post_form(url: impl Into<String>, body: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::PostForm(body.into()),
            timeout,
        }
    }
}

/// A fetched response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects.
    pub final_url: String,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Creates a page.
    pub fn new(final_url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            final_url: final_url.into(),
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for fetching a URL.
///
/// Proxy and user agent are fixed when the fetcher is built; the timeout
/// travels with each request. Non-success statuses are errors.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs the request and returns the body.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage>;
}
