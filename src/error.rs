//! Error types for the order flattener
//!
//! Every stage of an invocation (read, parse, flatten, encode, write,
//! trigger) reports failures through the single [`Error`] enum defined here.

use thiserror::Error;

/// The main error type for the order flattener
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Document Errors
    // ============================================================================
    #[error("Failed to decode document: {message}")]
    Decode { message: String },

    #[error("Missing field '{field}' at {path}")]
    MissingField { path: String, field: String },

    #[error("Type mismatch at {path}: {message}")]
    TypeMismatch { path: String, message: String },

    #[error("Invalid storage event: {message}")]
    InvalidEvent { message: String },

    // ============================================================================
    // Object Store Errors
    // ============================================================================
    #[error("Object not found: {location}")]
    ObjectNotFound { location: String },

    #[error("Access denied: {location}")]
    AccessDenied { location: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Invalid object location: {location}")]
    InvalidLocation { location: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Crawler Errors
    // ============================================================================
    #[error("Crawler '{crawler}' failed to start: {message}")]
    Crawler { crawler: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing config field error
    pub fn missing_config_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a missing document field error
    pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid event error
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a crawler error
    pub fn crawler(crawler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crawler {
            crawler: crawler.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Whether the error comes from the input document or event rather than
    /// from a collaborator
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Decode { .. }
                | Error::MissingField { .. }
                | Error::TypeMismatch { .. }
                | Error::InvalidEvent { .. }
                | Error::InvalidLocation { .. }
                | Error::JsonParse(_)
        )
    }

    /// Check if this error is retryable
    ///
    /// Informational only: retries belong to the host's invocation policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Storage { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// HTTP status code used when reporting this error from server mode
    pub fn status_code(&self) -> u16 {
        match self {
            e if e.is_input_error() => 400,
            Error::ObjectNotFound { .. } | Error::FileNotFound { .. } => 404,
            Error::AccessDenied { .. } => 403,
            _ => 500,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the order flattener
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
