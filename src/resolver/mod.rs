//! Metadata resolution pipeline.
//!
//! A request URL is validated, classified, then offered to the provider
//! sources in order (oEmbed, then the Data API when a key is configured).
//! The first source that succeeds wins. When none do, or the URL is not a
//! provider URL, the page is fetched and its HTML scraped.

pub mod classify;
pub mod data_api;
pub mod extract;
pub mod fetch;
pub mod oembed;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::Metadata;

pub use classify::{classify, Classification};
pub use data_api::DataApiClient;
pub use extract::extract;
pub use fetch::PageFetcher;
pub use oembed::OEmbedClient;

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";
pub const DEFAULT_DATA_API_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single provider source. Never surfaced to callers; the
/// resolver logs it and moves on to the next tier.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// One provider tier of the resolution pipeline.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        page_url: &str,
        classification: &Classification,
    ) -> Result<Metadata, SourceError>;
}

#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub oembed_endpoint: Url,
    pub data_api_endpoint: Url,
    /// The Data API tier is only enabled when this is a non-blank key.
    pub data_api_key: Option<String>,
    pub provider_timeout: Duration,
    pub fetch_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            oembed_endpoint: Url::parse(DEFAULT_OEMBED_ENDPOINT)
                .expect("default oEmbed endpoint is a valid URL"),
            data_api_endpoint: Url::parse(DEFAULT_DATA_API_ENDPOINT)
                .expect("default Data API endpoint is a valid URL"),
            data_api_key: None,
            provider_timeout: PROVIDER_TIMEOUT,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}

pub struct Resolver {
    sources: Vec<Box<dyn MetadataSource>>,
    pages: PageFetcher,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> AppResult<Self> {
        let http = Client::builder().build().map_err(|e| {
            tracing::error!(error = ?e, "Failed to build HTTP client");
            AppError::Internal
        })?;
        Ok(Self::with_client(http, config))
    }

    /// Build a resolver on an existing client. All tiers share its
    /// connection pool; timeouts are applied per request.
    pub fn with_client(http: Client, config: ResolverConfig) -> Self {
        let mut sources: Vec<Box<dyn MetadataSource>> = vec![Box::new(OEmbedClient::new(
            http.clone(),
            config.oembed_endpoint,
            config.provider_timeout,
        ))];

        if let Some(key) = config.data_api_key.filter(|k| !k.trim().is_empty()) {
            sources.push(Box::new(DataApiClient::new(
                http.clone(),
                config.data_api_endpoint,
                key,
                config.provider_timeout,
            )));
        }

        Self {
            sources,
            pages: PageFetcher::new(http, config.fetch_timeout),
        }
    }

    /// Names of the provider tiers in the order they are tried.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, raw_url: &str) -> AppResult<Metadata> {
        let target = parse_target(raw_url)?;
        let classification = classify(&target);

        if classification.is_special_provider {
            debug!(
                url = %raw_url,
                provider_id = %classification.provider_id,
                "URL matches video provider"
            );

            for source in &self.sources {
                match source.fetch(raw_url, &classification).await {
                    Ok(metadata) => {
                        info!(source = source.name(), url = %raw_url, "Resolved metadata from provider");
                        return Ok(metadata);
                    }
                    Err(e) => {
                        warn!(source = source.name(), error = %e, url = %raw_url, "Provider source failed, falling back");
                    }
                }
            }
        }

        let html = self.pages.fetch(&target).await?;
        let metadata = Metadata {
            url: raw_url.to_string(),
            ..extract(&html, &target)
        };

        info!(source = "html", url = %raw_url, "Resolved metadata from page");
        Ok(metadata)
    }
}

/// Validate a requested URL: it must be an absolute `http`/`https` URL with
/// a host.
pub fn parse_target(raw_url: &str) -> AppResult<Url> {
    if raw_url.trim().is_empty() {
        return Err(AppError::InvalidInput("missing url parameter".into()));
    }

    let parsed = Url::parse(raw_url).map_err(|_| AppError::InvalidInput("invalid url".into()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(AppError::InvalidInput(
                "only http and https urls are supported".into(),
            ))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AppError::InvalidInput("invalid url".into()));
    }

    Ok(parsed)
}
