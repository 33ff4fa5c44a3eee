//! Parquet encoding
//!
//! Encodes Arrow RecordBatches into in-memory Parquet bytes ready for an
//! object store `put`, and decodes them back for inspection.

use crate::config::OutputConfig;
use crate::error::{Error, Result};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use serde::{Deserialize, Serialize};

/// Compression codec selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    #[serde(alias = "uncompressed")]
    None,
}

impl From<CompressionCodec> for Compression {
    fn from(codec: CompressionCodec) -> Self {
        match codec {
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Zstd => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            CompressionCodec::Gzip => Compression::GZIP(parquet::basic::GzipLevel::default()),
            CompressionCodec::None => Compression::UNCOMPRESSED,
        }
    }
}

/// Parquet encoding options for flattened output
///
/// Dictionary encoding and column statistics are on by default; both help
/// query engines scanning the repeated order and customer columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetWriterConfig {
    pub codec: CompressionCodec,
    pub max_rows_per_group: usize,
    pub dictionary: bool,
    pub statistics: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            codec: CompressionCodec::default(),
            max_rows_per_group: 1024 * 1024,
            dictionary: true,
            statistics: true,
        }
    }
}

impl From<&OutputConfig> for ParquetWriterConfig {
    fn from(config: &OutputConfig) -> Self {
        Self::default()
            .with_codec(config.compression)
            .with_max_rows_per_group(config.row_group_size)
    }
}

impl ParquetWriterConfig {
    #[must_use]
    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn with_max_rows_per_group(mut self, rows: usize) -> Self {
        self.max_rows_per_group = rows;
        self
    }

    /// Plain encoding: no dictionary pages and no column statistics
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.dictionary = false;
        self.statistics = false;
        self
    }

    /// Parquet compression for the configured codec
    pub fn compression(&self) -> Compression {
        self.codec.into()
    }

    fn writer_properties(&self) -> WriterProperties {
        let statistics = if self.statistics {
            EnabledStatistics::Page
        } else {
            EnabledStatistics::None
        };

        WriterProperties::builder()
            .set_compression(self.compression())
            .set_max_row_group_size(self.max_rows_per_group)
            .set_dictionary_enabled(self.dictionary)
            .set_statistics_enabled(statistics)
            .set_created_by(format!("order-flattener {}", crate::VERSION))
            .build()
    }
}

/// Encode a RecordBatch as a complete Parquet file in memory
pub fn encode_parquet(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut buffer = Vec::with_capacity(batch.get_array_memory_size() / 2);

    let mut writer =
        ArrowWriter::try_new(&mut buffer, batch.schema(), Some(config.writer_properties()))
            .map_err(|e| Error::output(format!("cannot start Parquet file: {e}")))?;
    writer
        .write(batch)
        .map_err(|e| Error::output(format!("cannot encode {} rows: {e}", batch.num_rows())))?;
    writer
        .close()
        .map_err(|e| Error::output(format!("cannot finish Parquet footer: {e}")))?;

    Ok(Bytes::from(buffer))
}

/// Decode Parquet bytes into RecordBatches
pub fn decode_parquet(data: Bytes) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
    reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::from)
}
