//! HTTP catalog service trigger
//!
//! Sends `POST {endpoint}/crawlers/{name}/start` with body `{"name": ...}`.
//! Any 2xx is a start, 409 means a crawl is already running.

use super::{CrawlerStart, CrawlerTrigger};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Starts crawlers through an HTTP catalog service
#[derive(Debug, Clone)]
pub struct WebhookCrawler {
    client: Client,
    endpoint: Url,
}

impl WebhookCrawler {
    /// Create a trigger for `endpoint` with a per-request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::invalid_config("crawler.backend.endpoint", e.to_string()))?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::invalid_config(
                "crawler.backend.endpoint",
                format!("'{endpoint}' cannot be used as a base URL"),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// URL of the start request for a crawler
    pub fn start_url(&self, name: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["crawlers", name, "start"]);
        }
        url
    }
}

#[async_trait]
impl CrawlerTrigger for WebhookCrawler {
    async fn start_crawler(&self, name: &str) -> Result<CrawlerStart> {
        let url = self.start_url(name);
        debug!(crawler = name, %url, "Starting crawler via webhook");

        let response = self
            .client
            .post(url)
            .json(&json!({ "name": name }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(CrawlerStart::Started);
        }
        if status == StatusCode::CONFLICT {
            return Ok(CrawlerStart::AlreadyRunning);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::http_status(status.as_u16(), body))
    }
}
