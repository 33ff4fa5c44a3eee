//! CLI commands and argument parsing

use crate::output::CompressionCodec;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Order flattener CLI
#[derive(Parser, Debug)]
#[command(name = "order-flattener")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Handler configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Flatten one stored order document (s3://bucket/key or bucket/key)
    Process {
        /// Source object location
        #[arg(short, long)]
        source: String,
    },

    /// Handle an object-created event notification
    Invoke {
        /// Event JSON file
        #[arg(short, long, conflicts_with = "event_json")]
        event: Option<PathBuf>,

        /// Inline event JSON
        #[arg(long)]
        event_json: Option<String>,
    },

    /// Flatten a local order document into a local Parquet file
    Flatten {
        /// Order document (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Parquet file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Compression codec
        #[arg(long, value_enum, default_value = "snappy")]
        compression: Codec,
    },

    /// Print the rows of a flattened Parquet file as JSON lines
    Inspect {
        /// Parquet file to read
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum rows to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Validate and print the effective configuration
    Config,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Compression codec argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Codec {
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl From<Codec> for CompressionCodec {
    fn from(codec: Codec) -> Self {
        match codec {
            Codec::Snappy => CompressionCodec::Snappy,
            Codec::Zstd => CompressionCodec::Zstd,
            Codec::Gzip => CompressionCodec::Gzip,
            Codec::None => CompressionCodec::None,
        }
    }
}
