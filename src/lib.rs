// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Order Flattener
//!
//! Turns uploaded JSON order documents into flat, columnar Parquet files:
//! one row per (order, product) pair, written next to the source data and
//! followed by a schema crawler run so the new rows become queryable.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_flattener::config::HandlerConfig;
//! use order_flattener::decode::StorageEvent;
//! use order_flattener::handler::Handler;
//!
//! #[tokio::main]
//! async fn main() -> order_flattener::Result<()> {
//!     let config = HandlerConfig::load(Some("handler.yaml".as_ref()))?;
//!     let handler = Handler::from_config(config).await?;
//!
//!     let event = StorageEvent::from_slice(&std::fs::read("event.json")?)?;
//!     let result = handler.handle_event(&event).await?;
//!     println!("wrote {} rows", result.total_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Handler (event / process)                     │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────┬───────────┬────────┴──────┬─────────────┬─────────────┐
//! │ Storage  │  Decode   │   Flatten     │   Output    │  Catalog    │
//! ├──────────┼───────────┼───────────────┼─────────────┼─────────────┤
//! │ S3       │ Orders    │ order×product │ Arrow batch │ Glue        │
//! │ GCS      │ Events    │ rows          │ Parquet     │ Webhook     │
//! │ Azure    │           │               │ Output keys │ Disabled    │
//! │ Local    │           │               │             │             │
//! └──────────┴───────────┴───────────────┴─────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Order document model and flat rows
pub mod types;

/// Order document and storage event decoding
pub mod decode;

/// Order to row flattening
pub mod flatten;

/// Arrow/Parquet output and output key naming
pub mod output;

/// Object storage access
pub mod storage;

/// Schema crawler triggers
pub mod catalog;

/// Handler configuration
pub mod config;

/// Invocation handler
pub mod handler;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::HandlerConfig;
pub use handler::{transform, Handler, InvocationResult, ProcessOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
