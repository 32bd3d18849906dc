use std::time::Duration;

use reqwest::header::{ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT as USER_AGENT_HEADER};
use reqwest::Client;
use url::Url;

use crate::error::{AppError, AppResult};

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; LinkMetaBot/1.0)";
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-GB,en;q=0.9";

/// Generic HTML page fetcher, the tier every resolution can fall back to.
pub struct PageFetcher {
    http: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(http: Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// GET `url` and return its body decoded as text.
    ///
    /// Transport failures, non-2xx statuses and a body that times out or
    /// breaks off mid-stream are `UpstreamFetch`. A body that arrives but
    /// cannot be decoded to text is `Extraction`.
    pub async fn fetch(&self, url: &Url) -> AppResult<String> {
        let response = self
            .http
            .get(url.clone())
            .header(USER_AGENT_HEADER, USER_AGENT)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(CACHE_CONTROL, "no-cache")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = ?e, url = %url, "Failed to fetch target URL");
                AppError::UpstreamFetch("failed to fetch target".into())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, url = %url, "Target URL returned error status");
            return Err(AppError::UpstreamFetch("failed to fetch target".into()));
        }

        response.text().await.map_err(|e| {
            tracing::warn!(error = ?e, url = %url, "Failed to read target body");
            if e.is_timeout() || e.is_body() {
                AppError::UpstreamFetch("failed to fetch target".into())
            } else {
                AppError::Extraction("failed to parse html".into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use std::io::Write;

    fn fetcher() -> PageFetcher {
        fetcher_with_timeout(Duration::from_secs(10))
    }

    fn fetcher_with_timeout(timeout: Duration) -> PageFetcher {
        PageFetcher::new(Client::builder().no_proxy().build().unwrap(), timeout)
    }

    #[tokio::test]
    async fn sends_browser_headers_and_returns_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", USER_AGENT)
            .match_header("accept-language", ACCEPT_LANGUAGE_VALUE)
            .match_header("cache-control", "no-cache")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><title>ok</title></html>")
            .expect(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let body = fetcher().fetch(&url).await.unwrap();
        assert_eq!(body, "<html><title>ok</title></html>");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone")
            .with_status(410)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/gone", server.url())).unwrap();
        let result = fetcher().fetch(&url).await;
        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_error() {
        // Port 9 (discard) on loopback is not expected to accept connections.
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let result = fetcher().fetch(&url).await;
        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn slow_body_past_timeout_is_upstream_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(800));
                w.write_all(b"<html><title>late</title></html>")
            })
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/slow", server.url())).unwrap();
        let result = fetcher_with_timeout(Duration::from_millis(200))
            .fetch(&url)
            .await;
        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
    }
}
