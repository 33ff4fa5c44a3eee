//! CLI module
//!
//! Command-line interface for the order flattener.
//!
//! # Commands
//!
//! - `process` - Flatten one stored order document
//! - `invoke` - Handle an object-created event notification
//! - `flatten` - Flatten a local file into a local Parquet file
//! - `inspect` - Print the rows of a Parquet file
//! - `config` - Print the effective configuration
//! - `serve` - Start HTTP server mode

mod commands;
mod logging;
mod runner;
mod server;

pub use commands::{Cli, Codec, Commands};
pub use logging::log_filter;
pub use runner::Runner;
pub use server::{router, serve, ServerConfig};
