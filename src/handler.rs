//! Invocation handler
//!
//! One invocation processes one or more uploaded order documents:
//!
//! ```text
//! read ──► parse ──► flatten ──► encode ──► write ──► start crawler
//!  │         │          │           │         │            │
//!  └─────────┴──────────┴───────────┴─────────┘            │
//!        any failure aborts, nothing is written       failure is logged,
//!                                                     invocation succeeds
//! ```

use crate::catalog::{build_trigger, CrawlerStart, CrawlerTrigger};
use crate::config::HandlerConfig;
use crate::decode::{parse_orders, StorageEvent};
use crate::error::Result;
use crate::flatten::flatten;
use crate::output::{encode_parquet, rows_to_batch, OutputKeyBuilder, ParquetWriterConfig};
use crate::storage::{ObjectLocation, ObjectReader, ObjectStorage, ObjectWriter};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ============================================================================
// Results
// ============================================================================

/// What happened to the crawler after a write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrawlerStatus {
    Started,
    AlreadyRunning,
    /// No crawler is configured
    Skipped,
    /// The start request failed; the output was still written
    Failed { message: String },
}

impl From<CrawlerStart> for CrawlerStatus {
    fn from(start: CrawlerStart) -> Self {
        match start {
            CrawlerStart::Started => Self::Started,
            CrawlerStart::AlreadyRunning => Self::AlreadyRunning,
        }
    }
}

/// Result of processing one source object
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub source: ObjectLocation,
    pub destination: ObjectLocation,
    pub orders: usize,
    pub rows: usize,
    pub bytes: usize,
    pub crawler: CrawlerStatus,
}

/// Result of a whole invocation
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResult {
    pub status_code: u16,
    pub outcomes: Vec<ProcessOutcome>,
}

impl InvocationResult {
    fn ok(outcomes: Vec<ProcessOutcome>) -> Self {
        Self {
            status_code: 200,
            outcomes,
        }
    }

    /// Total rows written across all outcomes
    pub fn total_rows(&self) -> usize {
        self.outcomes.iter().map(|o| o.rows).sum()
    }
}

/// An order document converted to Parquet, not yet written anywhere
#[derive(Debug, Clone)]
pub struct Transformed {
    pub orders: usize,
    pub rows: usize,
    pub data: Bytes,
}

/// Parse, flatten and encode an order document
///
/// Pure apart from allocation; used by the handler and the local CLI path.
pub fn transform(document: &[u8], parquet: &ParquetWriterConfig) -> Result<Transformed> {
    let orders = parse_orders(document)?;
    let rows = flatten(&orders);
    let batch = rows_to_batch(&rows)?;
    let data = encode_parquet(&batch, parquet)?;

    Ok(Transformed {
        orders: orders.len(),
        rows: rows.len(),
        data,
    })
}

// ============================================================================
// Handler
// ============================================================================

/// Storage-triggered flattening handler
///
/// Collaborators are injected so the handler can run against in-memory
/// storage and fake crawlers.
pub struct Handler {
    reader: Arc<dyn ObjectReader>,
    writer: Arc<dyn ObjectWriter>,
    crawler: Arc<dyn CrawlerTrigger>,
    config: HandlerConfig,
    keys: OutputKeyBuilder,
    parquet: ParquetWriterConfig,
}

impl Handler {
    /// Create a handler from explicit collaborators
    pub fn new(
        reader: Arc<dyn ObjectReader>,
        writer: Arc<dyn ObjectWriter>,
        crawler: Arc<dyn CrawlerTrigger>,
        config: HandlerConfig,
    ) -> Self {
        let keys = OutputKeyBuilder::from_config(&config.destination, &config.output);
        let parquet = ParquetWriterConfig::from(&config.output);
        Self {
            reader,
            writer,
            crawler,
            config,
            keys,
            parquet,
        }
    }

    /// Create a handler whose collaborators are built from `config`
    pub async fn from_config(config: HandlerConfig) -> Result<Self> {
        let storage = Arc::new(ObjectStorage::new(config.storage.clone()));
        let crawler = build_trigger(&config.crawler).await?;
        Ok(Self::new(storage.clone(), storage, crawler, config))
    }

    /// Handler configuration
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handle an object-created event
    ///
    /// Records are processed in order; the first failure fails the invocation.
    #[instrument(skip_all, fields(records = event.records.len()))]
    pub async fn handle_event(&self, event: &StorageEvent) -> Result<InvocationResult> {
        let locations = event.locations()?;

        let mut outcomes = Vec::with_capacity(locations.len());
        for location in &locations {
            outcomes.push(self.process(location).await?);
        }

        Ok(InvocationResult::ok(outcomes))
    }

    /// Flatten one source object into a new Parquet object
    #[instrument(skip_all, fields(source = %source))]
    pub async fn process(&self, source: &ObjectLocation) -> Result<ProcessOutcome> {
        let document = self.reader.get(source).await?;
        info!(bytes = document.len(), "Read source document");

        let transformed = transform(&document, &self.parquet)?;
        info!(
            orders = transformed.orders,
            rows = transformed.rows,
            "Flattened orders"
        );

        let destination = ObjectLocation::new(&self.config.destination.bucket, self.keys.build());
        let size = transformed.data.len();
        self.writer.put(&destination, transformed.data).await?;
        info!(%destination, bytes = size, "Wrote Parquet output");

        let crawler = self.notify_crawler().await;

        Ok(ProcessOutcome {
            source: source.clone(),
            destination,
            orders: transformed.orders,
            rows: transformed.rows,
            bytes: size,
            crawler,
        })
    }

    /// Start the configured crawler; failures are logged, never returned
    async fn notify_crawler(&self) -> CrawlerStatus {
        if !self.crawler.is_enabled() {
            return CrawlerStatus::Skipped;
        }

        let name = &self.config.crawler.name;
        match self.crawler.start_crawler(name).await {
            Ok(start) => {
                info!(crawler = %name, ?start, "Crawler notified");
                start.into()
            }
            Err(e) => {
                warn!(
                    crawler = %name,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Failed to start crawler"
                );
                CrawlerStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_counts() {
        let doc = json!([
            {
                "order_id": "ORD1",
                "order_date": "2024-01-15",
                "total_amount": 20.0,
                "customer": {"customer_id": "C1", "name": "Ann", "email": "a@x.io", "address": "1 St"},
                "products": [
                    {"product_id": "P1", "name": "Pen", "category": "Office", "price": 10.0, "quantity": 1},
                    {"product_id": "P2", "name": "Pad", "category": "Office", "price": 10.0, "quantity": 1}
                ]
            },
            {
                "order_id": "ORD2",
                "order_date": "2024-01-16",
                "total_amount": 0.0,
                "customer": {"customer_id": "C2", "name": "Bo", "email": "b@x.io", "address": "2 St"},
                "products": []
            }
        ]);

        let transformed =
            transform(doc.to_string().as_bytes(), &ParquetWriterConfig::default()).unwrap();
        assert_eq!(transformed.orders, 2);
        assert_eq!(transformed.rows, 2);
        assert!(!transformed.data.is_empty());
    }

    #[test]
    fn test_transform_rejects_bad_document() {
        assert!(transform(b"{\"not\": \"a list\"}", &ParquetWriterConfig::default()).is_err());
    }

    #[test]
    fn test_crawler_status_serialization() {
        let value = serde_json::to_value(CrawlerStatus::Failed {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"status": "failed", "message": "boom"}));

        let value = serde_json::to_value(CrawlerStatus::AlreadyRunning).unwrap();
        assert_eq!(value, json!({"status": "already_running"}));
    }
}
