//! HTTP-based page fetcher using reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Proxy};
use tracing::debug;

use crate::fetcher::{FetchRequest, FetchedPage, PageFetcher, RequestMethod};
use crate::proxy::ProxyConfig;
use crate::{Result, SearchError};

/// Desktop browser user agent; several listing sites refuse bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// A page fetcher that uses plain HTTP requests via reqwest.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with the default user agent and no proxy.
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_USER_AGENT, None)
    }

    /// Creates an `HttpFetcher` routing every request through `proxy`.
    pub fn with_options(user_agent: &str, proxy: Option<&ProxyConfig>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);

        if let Some(proxy_config) = proxy {
            debug!("Using proxy: {}", proxy_config);
            let proxy = Proxy::all(proxy_config.url())
                .map_err(|e| SearchError::Config(format!("Failed to create proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| SearchError::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Creates an `HttpFetcher` with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage> {
        let builder = match &request.method {
            RequestMethod::Get => self.client.get(&request.url),
            RequestMethod::PostForm(body) => self
                .client
                .post(&request.url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.clone()),
        };

        let response = builder.timeout(request.timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout(request.url.clone())
            } else {
                SearchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.bytes().await?;
        Ok(FetchedPage::new(final_url, body.to_vec()))
    }
}
