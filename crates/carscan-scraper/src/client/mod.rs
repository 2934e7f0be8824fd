//! HTTP client for listing pages.

mod probe;

use std::time::Duration;

use carscan_core::{AppConfig, DelayRange};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

pub use probe::{inspect_page, PageIndicators, ProbeReport};

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// HTTP client for car-listing pages.
///
/// Sends a browser-like header profile and reuses one connection pool for
/// every request. Any network fault, timeout, or non-2xx status is a fetch
/// failure and is retried up to `max_attempts` attempts in total.
pub struct ListingClient {
    pub(super) client: Client,
    /// Total attempts per page, including the first one.
    pub(super) max_attempts: u32,
    pub(super) retry_delay: DelayRange,
}

impl ListingClient {
    /// Creates a `ListingClient` with the given timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_attempts: u32,
        retry_delay: DelayRange,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()?;
        Ok(Self {
            client,
            max_attempts,
            retry_delay,
        })
    }

    /// Creates a client from the `CARSCAN_SCRAPER_*` settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_attempts,
            config.scraper_retry_delay,
        )
    }

    /// Fetches a page body, retrying on any failure.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`]: non-2xx status on the last attempt.
    /// - [`ScraperError::Http`]: network failure or timeout on the last attempt.
    /// - [`ScraperError::Body`]: the body could not be read on the last attempt.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        self.fetch(url).await.map(|page| page.body)
    }

    /// Like [`Self::fetch_page`] but keeps the response status.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_page`].
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        retry_with_backoff(self.max_attempts, self.retry_delay, || async move {
            tracing::debug!(url, "fetching page");
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            let body = response.text().await.map_err(|e| ScraperError::Body {
                url: url.to_owned(),
                source: e,
            })?;

            Ok(FetchedPage {
                status: status.as_u16(),
                body,
            })
        })
        .await
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_headers_look_like_a_navigation() {
        let headers = browser_headers();
        assert!(headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html")));
        assert_eq!(
            headers.get("sec-fetch-mode").and_then(|v| v.to_str().ok()),
            Some("navigate")
        );
    }

    #[test]
    fn from_config_builds_client() {
        let config = AppConfig {
            env: carscan_core::Environment::Test,
            log_level: "info".to_string(),
            targets_path: "./config/targets.yaml".into(),
            output_dir: "./data".into(),
            brand: "Maruti Suzuki".to_string(),
            scraper_request_timeout_secs: 5,
            scraper_user_agent: "carscan-test/0.1".to_string(),
            scraper_max_attempts: 2,
            scraper_retry_delay: DelayRange::ZERO,
            scraper_fragment_delay: DelayRange::ZERO,
            scraper_location_delay: DelayRange::ZERO,
            scraper_max_fragments: 20,
            sample_size: 10,
            sample_on_empty: true,
            top_n: 5,
        };
        let client = ListingClient::from_config(&config).unwrap();
        assert_eq!(client.max_attempts, 2);
        assert_eq!(client.retry_delay, DelayRange::ZERO);
    }
}
