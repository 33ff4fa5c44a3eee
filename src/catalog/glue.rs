//! AWS Glue crawler trigger

use super::{CrawlerStart, CrawlerTrigger};
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::Client;
use tracing::debug;

/// Starts AWS Glue crawlers
#[derive(Debug, Clone)]
pub struct GlueCrawler {
    client: Client,
}

impl GlueCrawler {
    /// Wrap an existing Glue client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a client from the default AWS credential and region chain
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl CrawlerTrigger for GlueCrawler {
    async fn start_crawler(&self, name: &str) -> Result<CrawlerStart> {
        debug!(crawler = name, "Starting Glue crawler");

        match self.client.start_crawler().name(name).send().await {
            Ok(_) => Ok(CrawlerStart::Started),
            Err(err) => match err.as_service_error() {
                Some(service) if service.is_crawler_running_exception() => {
                    Ok(CrawlerStart::AlreadyRunning)
                }
                _ => Err(Error::crawler(name, DisplayErrorContext(&err).to_string())),
            },
        }
    }
}
