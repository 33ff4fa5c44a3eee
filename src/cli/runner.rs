//! CLI runner
//!
//! Executes CLI commands. Results are printed to stdout as JSON; logs go
//! through `tracing`.

use super::commands::{Cli, Commands};
use super::server::{serve, ServerConfig};
use crate::config::HandlerConfig;
use crate::decode::StorageEvent;
use crate::error::{Error, Result, ResultExt};
use crate::handler::{transform, Handler};
use crate::output::{batch_to_rows, decode_parquet, CompressionCodec, ParquetWriterConfig};
use crate::storage::ObjectLocation;
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Process { source } => self.process(source).await,
            Commands::Invoke { event, event_json } => {
                self.invoke(event.as_deref(), event_json.as_deref()).await
            }
            Commands::Flatten {
                input,
                output,
                compression,
            } => self.flatten(input, output, (*compression).into()),
            Commands::Inspect { input, limit } => self.inspect(input, *limit),
            Commands::Config => self.show_config(),
            Commands::Serve { port } => self.serve(*port).await,
        }
    }

    /// Load and validate the handler configuration
    fn load_config(&self) -> Result<HandlerConfig> {
        HandlerConfig::load(self.cli.config.as_deref())
    }

    async fn build_handler(&self) -> Result<Handler> {
        Handler::from_config(self.load_config()?).await
    }

    /// Flatten one stored object
    async fn process(&self, source: &str) -> Result<()> {
        let source = ObjectLocation::parse(source)?;
        let handler = self.build_handler().await?;
        let outcome = handler.process(&source).await?;
        self.output_message(&outcome);
        Ok(())
    }

    /// Handle an event read from a file or passed inline
    async fn invoke(&self, event: Option<&Path>, event_json: Option<&str>) -> Result<()> {
        let raw = match (event, event_json) {
            (Some(path), _) => read_file(path)?,
            (None, Some(inline)) => inline.as_bytes().to_vec(),
            (None, None) => {
                return Err(Error::config(
                    "Provide an event with --event <FILE> or --event-json <JSON>",
                ))
            }
        };
        let event = StorageEvent::from_slice(&raw)?;

        let handler = self.build_handler().await?;
        let result = handler.handle_event(&event).await?;
        info!(
            objects = result.outcomes.len(),
            rows = result.total_rows(),
            "Invocation complete"
        );
        self.output_message(&result);
        Ok(())
    }

    /// Flatten a local order document into a local Parquet file
    fn flatten(&self, input: &Path, output: &Path, compression: CompressionCodec) -> Result<()> {
        let document = read_file(input)?;
        let parquet = ParquetWriterConfig::default().with_codec(compression);
        let transformed = transform(&document, &parquet)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(output, &transformed.data)
            .with_context(|| format!("writing {}", output.display()))?;

        info!(
            input = %input.display(),
            output = %output.display(),
            rows = transformed.rows,
            "Wrote Parquet file"
        );
        self.output_message(&json!({
            "input": input.display().to_string(),
            "output": output.display().to_string(),
            "orders": transformed.orders,
            "rows": transformed.rows,
            "bytes": transformed.data.len(),
        }));
        Ok(())
    }

    /// Print the rows of a flattened Parquet file, one JSON object per line
    fn inspect(&self, input: &Path, limit: Option<usize>) -> Result<()> {
        let data = Bytes::from(read_file(input)?);
        let batches = decode_parquet(data)?;

        let mut printed = 0;
        for batch in &batches {
            for row in batch_to_rows(batch)? {
                if limit.is_some_and(|limit| printed >= limit) {
                    return Ok(());
                }
                println!("{}", serde_json::to_string(&row)?);
                printed += 1;
            }
        }
        Ok(())
    }

    /// Print the effective configuration after env overrides
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        self.output_message(&config);
        Ok(())
    }

    /// Start HTTP server mode
    async fn serve(&self, port: u16) -> Result<()> {
        let handler = Arc::new(self.build_handler().await?);
        serve(handler, ServerConfig { port }).await
    }

    /// Output a message
    fn output_message<T: Serialize>(&self, msg: &T) {
        let rendered = if self.cli.verbose {
            serde_json::to_string_pretty(msg)
        } else {
            serde_json::to_string(msg)
        };
        println!("{}", rendered.unwrap_or_default());
    }
}

/// Read a local file, mapping a missing file to [`Error::FileNotFound`]
fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const ORDERS: &str = r#"[
        {
            "order_id": "ORD123",
            "order_date": "2024-01-15",
            "total_amount": 59.97,
            "customer": {"customer_id": "CUST1", "name": "Jane Doe", "email": "jane@example.com", "address": "1 Main St"},
            "products": [
                {"product_id": "P1", "name": "Widget", "category": "Tools", "price": 19.99, "quantity": 2},
                {"product_id": "P2", "name": "Gadget", "category": "Tools", "price": 19.99, "quantity": 1}
            ]
        }
    ]"#;

    fn runner(args: &[&str]) -> Runner {
        let mut full = vec!["order-flattener"];
        full.extend_from_slice(args);
        Runner::new(Cli::parse_from(full))
    }

    #[tokio::test]
    async fn test_flatten_writes_readable_parquet() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("orders.json");
        let output = dir.path().join("out/orders.parquet");
        std::fs::write(&input, ORDERS).unwrap();

        runner(&[
            "flatten",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--compression",
            "zstd",
        ])
        .run()
        .await
        .unwrap();

        let batches = decode_parquet(Bytes::from(std::fs::read(&output).unwrap())).unwrap();
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 2);

        runner(&["inspect", "-i", output.to_str().unwrap(), "--limit", "1"])
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_flatten_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = runner(&[
            "flatten",
            "-i",
            dir.path().join("absent.json").to_str().unwrap(),
            "-o",
            dir.path().join("out.parquet").to_str().unwrap(),
        ])
        .run()
        .await
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_flatten_invalid_document_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("orders.json");
        let output = dir.path().join("orders.parquet");
        std::fs::write(&input, r#"[{"order_id": "X"}]"#).unwrap();

        let err = runner(&[
            "flatten",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .run()
        .await
        .unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_invoke_with_local_storage() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("raw/incoming")).unwrap();
        std::fs::write(dir.path().join("raw/incoming/orders.json"), ORDERS).unwrap();

        let config_path = dir.path().join("handler.yaml");
        std::fs::write(
            &config_path,
            format!(
                "storage:\n  type: local\n  root: {}\ndestination:\n  bucket: curated\n  prefix: flat\ncrawler:\n  backend:\n    type: disabled\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let event = StorageEvent::for_location(&ObjectLocation::new("raw", "incoming/orders.json"));
        runner(&[
            "--config",
            config_path.to_str().unwrap(),
            "invoke",
            "--event-json",
            &serde_json::to_string(&event).unwrap(),
        ])
        .run()
        .await
        .unwrap();

        let written: Vec<_> = std::fs::read_dir(dir.path().join("curated/flat"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written[0].extension().and_then(|e| e.to_str()),
            Some("parquet")
        );
    }

    #[tokio::test]
    async fn test_invoke_requires_event() {
        let err = runner(&["invoke"]).run().await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
