//! Schema crawler triggers
//!
//! After output is written the handler asks an external catalog service to
//! (re)discover the table schema by starting a named crawler. The call is a
//! best-effort notification; callers decide what a failure means.
//!
//! Backends:
//! - [`GlueCrawler`] - AWS Glue `StartCrawler`
//! - [`WebhookCrawler`] - HTTP catalog service
//! - [`DisabledCrawler`] - no-op

mod glue;
mod webhook;

pub use glue::GlueCrawler;
pub use webhook::WebhookCrawler;

use crate::config::{CrawlerBackend, CrawlerConfig};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a successful start request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlerStart {
    /// A new crawl was started
    Started,
    /// A crawl was already in progress; it will pick up the new object
    AlreadyRunning,
}

/// Starts an external cataloging job by name
#[async_trait]
pub trait CrawlerTrigger: Send + Sync {
    /// Request a crawl of the named crawler
    async fn start_crawler(&self, name: &str) -> Result<CrawlerStart>;

    /// Whether this trigger contacts anything at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Trigger that never starts anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCrawler;

#[async_trait]
impl CrawlerTrigger for DisabledCrawler {
    async fn start_crawler(&self, _name: &str) -> Result<CrawlerStart> {
        Ok(CrawlerStart::Started)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Build the trigger described by `config`
pub async fn build_trigger(config: &CrawlerConfig) -> Result<Arc<dyn CrawlerTrigger>> {
    let trigger: Arc<dyn CrawlerTrigger> = match &config.backend {
        CrawlerBackend::Glue { region } => Arc::new(GlueCrawler::from_env(region.clone()).await),
        CrawlerBackend::Webhook {
            endpoint,
            timeout_seconds,
        } => Arc::new(WebhookCrawler::new(
            endpoint,
            Duration::from_secs(*timeout_seconds),
        )?),
        CrawlerBackend::Disabled => Arc::new(DisabledCrawler),
    };
    Ok(trigger)
}
