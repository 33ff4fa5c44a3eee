//! Output module
//!
//! Handles Arrow RecordBatch creation, in-memory Parquet encoding and
//! destination key naming.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - The fixed 12-column flat row schema
//! - Converting flat rows to Arrow RecordBatches and back
//! - Encoding and decoding Parquet bytes
//! - Generating unique output keys

mod key;
mod schema;
mod writer;

pub use key::{KeyStrategy, OutputKeyBuilder};
pub use schema::{batch_to_rows, flat_row_schema, rows_to_batch};
pub use writer::{decode_parquet, encode_parquet, CompressionCodec, ParquetWriterConfig};
