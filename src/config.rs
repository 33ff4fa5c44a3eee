//! Handler configuration
//!
//! Configuration is read from a YAML file, then overridden by
//! `ORDER_FLATTENER_*` environment variables, then validated.
//!
//! ```yaml
//! storage:
//!   type: s3
//! destination:
//!   bucket: processed-orders
//!   prefix: flattened
//! output:
//!   key_strategy: unique
//!   partition_by_date: true
//!   compression: snappy
//! crawler:
//!   name: orders-crawler
//!   backend:
//!     type: glue
//! ```

use crate::error::{Error, Result};
use crate::output::{CompressionCodec, KeyStrategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ORDER_FLATTENER_";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete handler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Where source and destination objects live
    #[serde(default)]
    pub storage: StorageBackend,

    /// Destination bucket and key prefix
    #[serde(default)]
    pub destination: DestinationConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Schema crawler to start after each write
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

impl HandlerConfig {
    /// Parse a config from a YAML string (no env overrides, no validation)
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a config from a YAML file (no env overrides, no validation)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_yaml(&contents)
    }

    /// Load config from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ORDER_FLATTENER_*` overrides using `lookup` to resolve variables
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(bucket) = var("DEST_BUCKET") {
            self.destination.bucket = bucket;
        }
        if let Some(prefix) = var("DEST_PREFIX") {
            self.destination.prefix = prefix;
        }

        if let Some(storage) = var("STORAGE") {
            self.storage = match storage.to_lowercase().as_str() {
                // Same kind as the file: keep its endpoint and region
                "s3" if matches!(self.storage, StorageBackend::S3 { .. }) => {
                    self.storage.clone()
                }
                "s3" => StorageBackend::default(),
                "gcs" | "gs" => StorageBackend::Gcs,
                "azure" | "az" => StorageBackend::Azure,
                "memory" => StorageBackend::Memory,
                "local" => {
                    let root = var("LOCAL_ROOT").ok_or_else(|| {
                        Error::missing_config_field(format!("{ENV_PREFIX}LOCAL_ROOT"))
                    })?;
                    StorageBackend::Local { root: root.into() }
                }
                other => {
                    return Err(Error::invalid_config(
                        "storage",
                        format!("unknown storage backend '{other}'"),
                    ))
                }
            };
        } else if let Some(root) = var("LOCAL_ROOT") {
            self.storage = StorageBackend::Local { root: root.into() };
        }

        if let Some(name) = var("CRAWLER_NAME") {
            self.crawler.name = name;
        }
        if let Some(backend) = var("CRAWLER_BACKEND") {
            let (file_endpoint, file_timeout) = match &self.crawler.backend {
                CrawlerBackend::Webhook {
                    endpoint,
                    timeout_seconds,
                } => (Some(endpoint.clone()), Some(*timeout_seconds)),
                _ => (None, None),
            };

            self.crawler.backend = match backend.to_lowercase().as_str() {
                "glue" if matches!(self.crawler.backend, CrawlerBackend::Glue { .. }) => {
                    self.crawler.backend.clone()
                }
                "glue" => CrawlerBackend::default(),
                "disabled" | "none" => CrawlerBackend::Disabled,
                "webhook" => CrawlerBackend::Webhook {
                    endpoint: var("CRAWLER_ENDPOINT").or(file_endpoint).ok_or_else(|| {
                        Error::missing_config_field(format!("{ENV_PREFIX}CRAWLER_ENDPOINT"))
                    })?,
                    timeout_seconds: file_timeout.unwrap_or_else(default_webhook_timeout),
                },
                other => {
                    return Err(Error::invalid_config(
                        "crawler.backend",
                        format!("unknown crawler backend '{other}'"),
                    ))
                }
            };
        } else if let Some(new_endpoint) = var("CRAWLER_ENDPOINT") {
            match &mut self.crawler.backend {
                CrawlerBackend::Webhook { endpoint, .. } => *endpoint = new_endpoint,
                other => {
                    *other = CrawlerBackend::Webhook {
                        endpoint: new_endpoint,
                        timeout_seconds: default_webhook_timeout(),
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.destination.bucket.trim().is_empty() {
            return Err(Error::missing_config_field("destination.bucket"));
        }

        if self.output.file_stem.trim().is_empty() {
            return Err(Error::invalid_config("output.file_stem", "must not be empty"));
        }

        if self.output.row_group_size == 0 {
            return Err(Error::invalid_config(
                "output.row_group_size",
                "must be greater than zero",
            ));
        }

        match &self.crawler.backend {
            CrawlerBackend::Disabled => {}
            backend => {
                if self.crawler.name.trim().is_empty() {
                    return Err(Error::missing_config_field("crawler.name"));
                }
                if let CrawlerBackend::Webhook { endpoint, .. } = backend {
                    Url::parse(endpoint).map_err(|e| {
                        Error::invalid_config("crawler.backend.endpoint", e.to_string())
                    })?;
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Storage Config
// ============================================================================

/// Object storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// AWS S3 (or S3-compatible), credentials from the environment
    S3 {
        /// Custom endpoint (MinIO, R2, LocalStack)
        #[serde(default)]
        endpoint: Option<String>,
        /// Region override
        #[serde(default)]
        region: Option<String>,
    },

    /// Google Cloud Storage, credentials from the environment
    Gcs,

    /// Azure Blob Storage, credentials from the environment
    Azure,

    /// Local filesystem; each bucket is a directory under `root`
    Local { root: PathBuf },

    /// In-memory storage
    Memory,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::S3 {
            endpoint: None,
            region: None,
        }
    }
}

impl StorageBackend {
    /// Short backend name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::Gcs => "gcs",
            Self::Azure => "azure",
            Self::Local { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

// ============================================================================
// Destination Config
// ============================================================================

/// Destination for flattened output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination bucket (required)
    #[serde(default)]
    pub bucket: String,

    /// Key prefix inside the bucket
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "flattened".to_string()
}

// ============================================================================
// Output Config
// ============================================================================

/// Output file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name stem, before the timestamp suffix
    #[serde(default = "default_file_stem")]
    pub file_stem: String,

    /// How output keys are made unique
    #[serde(default)]
    pub key_strategy: KeyStrategy,

    /// Add a Hive-style `dt=YYYY-MM-DD` directory
    #[serde(default)]
    pub partition_by_date: bool,

    /// Parquet compression codec
    #[serde(default)]
    pub compression: CompressionCodec,

    /// Maximum rows per Parquet row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_stem: default_file_stem(),
            key_strategy: KeyStrategy::default(),
            partition_by_date: false,
            compression: CompressionCodec::default(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_file_stem() -> String {
    "orders_flattened".to_string()
}

fn default_row_group_size() -> usize {
    1024 * 1024
}

// ============================================================================
// Crawler Config
// ============================================================================

/// Schema crawler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Crawler (job) name
    #[serde(default)]
    pub name: String,

    /// How the crawler is started
    #[serde(default)]
    pub backend: CrawlerBackend,
}

/// Crawler backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrawlerBackend {
    /// AWS Glue `StartCrawler`
    Glue {
        /// Region override
        #[serde(default)]
        region: Option<String>,
    },

    /// HTTP catalog service: `POST {endpoint}/crawlers/{name}/start`
    Webhook {
        endpoint: String,
        #[serde(default = "default_webhook_timeout")]
        timeout_seconds: u64,
    },

    /// Do not start any crawler
    Disabled,
}

impl Default for CrawlerBackend {
    fn default() -> Self {
        Self::Glue { region: None }
    }
}

fn default_webhook_timeout() -> u64 {
    10
}
