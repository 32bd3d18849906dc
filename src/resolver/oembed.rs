use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{Classification, MetadataSource, SourceError};
use crate::models::Metadata;

/// Subset of the oEmbed JSON response the service uses.
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
    provider_name: Option<String>,
}

impl OEmbedResponse {
    // oEmbed has no description, so the author name stands in for it.
    fn into_metadata(self, page_url: &str) -> Metadata {
        Metadata {
            url: page_url.to_string(),
            page_name: self.provider_name.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.author_name.unwrap_or_default(),
            images: vec![self.thumbnail_url.unwrap_or_default()],
        }
    }
}

/// Keyless oEmbed client for the video provider.
pub struct OEmbedClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl OEmbedClient {
    pub fn new(http: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            http,
            endpoint,
            timeout,
        }
    }

    pub async fn fetch_embed(&self, page_url: &str) -> Result<Metadata, SourceError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("url", page_url), ("format", "json")])
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SourceError::Status(response.status()));
        }

        let body: OEmbedResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(body.into_metadata(page_url))
    }
}

#[async_trait]
impl MetadataSource for OEmbedClient {
    fn name(&self) -> &'static str {
        "oembed"
    }

    async fn fetch(
        &self,
        page_url: &str,
        _classification: &Classification,
    ) -> Result<Metadata, SourceError> {
        self.fetch_embed(page_url).await
    }
}
