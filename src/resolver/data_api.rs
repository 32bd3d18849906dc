use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{Classification, MetadataSource, SourceError};
use crate::models::Metadata;

/// Thumbnail quality used for the preview image.
const THUMBNAIL_QUALITY: &str = "high";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

// Every field may be missing or `null`; both decode to an empty string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    channel_title: Option<String>,
    thumbnails: Option<HashMap<String, Option<Thumbnail>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    url: Option<String>,
}

/// Keyed client for the YouTube Data API v3 `videos` resource.
pub struct DataApiClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl DataApiClient {
    pub fn new(http: Client, endpoint: Url, api_key: String, timeout: Duration) -> Self {
        Self {
            http,
            endpoint,
            api_key,
            timeout,
        }
    }

    /// Look up a video's snippet by ID.
    ///
    /// An empty ID fails with `NotFound` without touching the network. The
    /// returned record's `url` is the video ID, not the page URL.
    pub async fn fetch_by_id(&self, video_id: &str) -> Result<Metadata, SourceError> {
        if video_id.is_empty() {
            return Err(SourceError::NotFound("empty video ID".into()));
        }

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SourceError::Status(response.status()));
        }

        let body: VideoListResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let snippet = body
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet)
            .ok_or_else(|| SourceError::NotFound(format!("no video found for ID {video_id}")))?;

        let thumbnail = snippet
            .thumbnails
            .and_then(|mut thumbnails| thumbnails.remove(THUMBNAIL_QUALITY).flatten())
            .and_then(|t| t.url)
            .unwrap_or_default();

        Ok(Metadata {
            url: video_id.to_string(),
            page_name: snippet.channel_title.unwrap_or_default(),
            title: snippet.title.unwrap_or_default(),
            description: snippet.description.unwrap_or_default(),
            images: vec![thumbnail],
        })
    }
}

#[async_trait]
impl MetadataSource for DataApiClient {
    fn name(&self) -> &'static str {
        "data_api"
    }

    async fn fetch(
        &self,
        _page_url: &str,
        classification: &Classification,
    ) -> Result<Metadata, SourceError> {
        self.fetch_by_id(&classification.provider_id).await
    }
}
