//! End-to-end lookups against a scripted network.
//!
//! Every page and image is served from memory, so these run offline and
//! on a paused clock.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::time::Instant;

use search_that::fetcher::{FetchRequest, FetchedPage, PageFetcher};
use search_that::{Config, Resolver, ResponseStatus, SearchError};

const POOL_A: &str = "https://a.example/search?q=%s";
const POOL_B: &str = "https://b.example/search?q=%s";

struct Route {
    delay: Duration,
    body: Vec<u8>,
}

/// Serves fixed bodies by URL; anything else is a 404.
#[derive(Default)]
struct ScriptedNetwork {
    routes: HashMap<String, Route>,
}

impl ScriptedNetwork {
    fn page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                delay: Duration::ZERO,
                body: body.into(),
            },
        );
        self
    }

    fn hung(mut self, url: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route {
                delay: Duration::from_secs(30),
                body: Vec::new(),
            },
        );
        self
    }
}

#[async_trait]
impl PageFetcher for ScriptedNetwork {
    async fn fetch(&self, request: &FetchRequest) -> search_that::Result<FetchedPage> {
        let route = self.routes.get(&request.url).ok_or_else(|| SearchError::Status {
            url: request.url.clone(),
            status: 404,
        })?;
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        Ok(FetchedPage::new(request.url.clone(), route.body.clone()))
    }
}

fn listing(title: &str, href: &str) -> String {
    format!(
        r#"<html><body><div class="result"><a href="{}" title="{}">{}</a></div></body></html>"#,
        href, title, title
    )
}

fn detail(cover: &str) -> String {
    format!(
        r#"<html><head><meta property="og:image" content="{}"></head><body></body></html>"#,
        cover
    )
}

fn checkerboard_png() -> Vec<u8> {
    let image = RgbaImage::from_fn(40, 30, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn config(extra: &str) -> Config {
    let json = format!(
        r#"{{
            "pool_a_sources": ["{}"],
            "pool_b_sources": ["{}"],
            "timeout": 2.0,
            "cover_mosaic_level": 5,
            "cover_regexes": ["og:image\" content=\"([^\"]+)\""]
            {}
        }}"#,
        POOL_A, POOL_B, extra
    );
    Config::from_json_str(&json).unwrap()
}

/// Pool A has a full answer for ABC-123.
fn pool_a_network() -> ScriptedNetwork {
    ScriptedNetwork::default()
        .page(
            "https://a.example/search?q=ABC-123",
            listing("ABC-123 cover", "/v/abc-123"),
        )
        .page("https://a.example/v/abc-123", detail("/img/abc-123.png"))
        .page("https://a.example/img/abc-123.png", checkerboard_png())
}

fn resolver(config: Config, network: ScriptedNetwork) -> Resolver {
    Resolver::with_fetcher(config, Arc::new(network)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_resolve_ok_while_other_pool_hangs() {
    let network = pool_a_network().hung("https://b.example/search?q=ABC-123");
    let resolver = resolver(config(""), network);

    let started = Instant::now();
    let response = resolver.resolve("ABC-123").await;
    let elapsed = started.elapsed();

    assert_eq!(response.status, ResponseStatus::Ok);
    assert_eq!(response.title.as_deref(), Some("ABC-123 cover"));
    assert_eq!(response.link.as_deref(), Some("https://a.example/v/abc-123"));
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(3));

    let image = response.image.unwrap();
    assert_eq!(image.mime, "image/png");
    assert_ne!(image.bytes, checkerboard_png());
    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
}

#[tokio::test]
async fn test_error_keywords_leave_nothing() {
    let resolver = resolver(config(r#", "error_keywords": ["cover"]"#), pool_a_network());

    let response = resolver.resolve("ABC-123").await;

    assert_eq!(response.status, ResponseStatus::NoResult);
    assert!(response.image.is_none());
    assert!(response.message.contains("google.com/search"));
}

#[tokio::test]
async fn test_missing_cover_degrades() {
    let network = ScriptedNetwork::default()
        .page(
            "https://a.example/search?q=ABC-123",
            listing("ABC-123 cover", "/v/abc-123"),
        )
        .page("https://a.example/v/abc-123", "<html><body>no image</body></html>");
    let resolver = resolver(config(r#", "return_details": false"#), network);

    let response = resolver.resolve("ABC-123").await;

    assert_eq!(response.status, ResponseStatus::Degraded);
    assert!(response.image.is_none());
    assert_eq!(response.title.as_deref(), Some("ABC-123 cover"));
    assert_eq!(response.link.as_deref(), Some("https://a.example/v/abc-123"));
}

#[tokio::test]
async fn test_undecodable_cover_degrades() {
    let network = ScriptedNetwork::default()
        .page(
            "https://a.example/search?q=ABC-123",
            listing("ABC-123 cover", "/v/abc-123"),
        )
        .page("https://a.example/v/abc-123", detail("/img/abc-123.png"))
        .page("https://a.example/img/abc-123.png", "not an image");
    let resolver = resolver(config(""), network);

    let response = resolver.resolve("ABC-123").await;

    assert_eq!(response.status, ResponseStatus::Degraded);
    assert!(response.image.is_none());
}

#[tokio::test]
async fn test_all_sources_unreachable() {
    let resolver = resolver(config(""), ScriptedNetwork::default());

    let response = resolver.resolve("ABC-123").await;

    assert_eq!(response.status, ResponseStatus::NoResult);
    assert!(response.message.contains("unreachable"));
}

#[tokio::test]
async fn test_reduce_first_prefers_pool_b() {
    let network = pool_a_network().page(
        "https://b.example/search?q=ABC-123",
        listing("ABC-123 other cut", "https://b.example/watch/abc-123"),
    );
    let resolver = resolver(config(r#", "mosaic_reduce_first": true"#), network);

    let response = resolver.resolve("ABC-123").await;

    assert_eq!(response.link.as_deref(), Some("https://b.example/watch/abc-123"));
    assert_eq!(response.status, ResponseStatus::Degraded);
}

#[tokio::test]
async fn test_pool_a_only_ignores_pool_b() {
    let network = pool_a_network().page(
        "https://b.example/search?q=ABC-123",
        listing("ABC-123 other cut", "https://b.example/watch/abc-123"),
    );
    let resolver = resolver(
        config(r#", "search_mode": "pool_a", "mosaic_reduce_first": true"#),
        network,
    );

    let response = resolver.resolve("ABC-123").await;

    assert_eq!(response.status, ResponseStatus::Ok);
    assert_eq!(response.link.as_deref(), Some("https://a.example/v/abc-123"));
}

#[tokio::test]
async fn test_resolve_text_finds_code_in_sentence() {
    let resolver = resolver(config(""), pool_a_network());

    let response = resolver.resolve_text("帮我查 ABC-123 的封面").await;
    assert_eq!(response.status, ResponseStatus::Ok);
    assert!(response.image_base64().unwrap().starts_with("base64://"));

    let response = resolver.resolve_text("no code in here").await;
    assert_eq!(response.status, ResponseStatus::NoResult);
}

#[tokio::test]
async fn test_response_json_shape() {
    let resolver = resolver(config(""), pool_a_network());

    let response = resolver.resolve("ABC-123").await;
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["image"].as_str().is_some_and(|s| !s.is_empty()));
    assert_eq!(json["link"], "https://a.example/v/abc-123");
}

#[test]
fn test_sample_config_loads() {
    let config = Config::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/config.json")).unwrap();
    let registry = config.registry().unwrap();

    assert_eq!(registry.len(), 7);
    assert_eq!(config.cover_regexes.len(), 4);
    assert!(config.proxy.is_none());
    assert!(Resolver::new(config).is_ok());
}
