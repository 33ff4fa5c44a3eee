//! Destination key naming
//!
//! Format: `{prefix}/[dt={YYYY-MM-DD}/]{stem}_{timestamp}[_{unique}].parquet`
//!
//! Examples:
//! - `flattened/orders_flattened_20240115103000123_6f1c...e2.parquet`
//! - `flattened/dt=2024-01-15/orders_flattened_20240115103000.parquet`

use crate::config::{DestinationConfig, OutputConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How output keys are made distinct between invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    /// Millisecond timestamp plus a random UUID; safe under concurrency
    #[default]
    Unique,

    /// Seconds-resolution timestamp only
    ///
    /// Two invocations within the same second produce the same key and the
    /// later write replaces the earlier one.
    Timestamp,
}

/// Builds destination keys for flattened output
#[derive(Debug, Clone)]
pub struct OutputKeyBuilder {
    prefix: String,
    file_stem: String,
    strategy: KeyStrategy,
    partition_by_date: bool,
}

impl OutputKeyBuilder {
    /// Create a builder with the default (unique) strategy and no date partition
    pub fn new(prefix: impl Into<String>, file_stem: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            file_stem: file_stem.into(),
            strategy: KeyStrategy::default(),
            partition_by_date: false,
        }
    }

    /// Create a builder from handler configuration
    pub fn from_config(destination: &DestinationConfig, output: &OutputConfig) -> Self {
        Self::new(destination.prefix.clone(), output.file_stem.clone())
            .with_strategy(output.key_strategy)
            .with_date_partition(output.partition_by_date)
    }

    /// Set the uniqueness strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable or disable the `dt=` date directory
    #[must_use]
    pub fn with_date_partition(mut self, enabled: bool) -> Self {
        self.partition_by_date = enabled;
        self
    }

    /// Build a key for the current time
    pub fn build(&self) -> String {
        self.build_at(Utc::now())
    }

    /// Build a key for the given time
    pub fn build_at(&self, now: DateTime<Utc>) -> String {
        let mut key = String::new();

        let prefix = self.prefix.trim_matches('/');
        if !prefix.is_empty() {
            key.push_str(prefix);
            key.push('/');
        }

        if self.partition_by_date {
            key.push_str(&format!("dt={}/", now.format("%Y-%m-%d")));
        }

        let file_name = match self.strategy {
            KeyStrategy::Unique => format!(
                "{}_{}_{}.parquet",
                self.file_stem,
                now.format("%Y%m%d%H%M%S%3f"),
                Uuid::new_v4().simple()
            ),
            KeyStrategy::Timestamp => {
                format!("{}_{}.parquet", self.file_stem, now.format("%Y%m%d%H%M%S"))
            }
        };
        key.push_str(&file_name);

        key
    }
}
