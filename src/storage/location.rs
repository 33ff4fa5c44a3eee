//! Bucket + key addressing

use crate::error::{Error, Result};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL schemes accepted by [`ObjectLocation::parse`]
const SCHEMES: [&str; 3] = ["s3", "gs", "az"];

/// Address of an object: a bucket (or container) and a key within it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Create a location from bucket and key
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a location
    ///
    /// Supported formats:
    /// - `s3://bucket/key` - AWS S3
    /// - `gs://bucket/key` - Google Cloud Storage
    /// - `az://container/key` - Azure Blob Storage
    /// - `bucket/key` - bare bucket and key
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidLocation {
            location: input.to_string(),
        };

        // Split by hand: `#` and `?` are legal in object keys
        let (bucket, key) = match input.split_once("://") {
            Some((scheme, rest)) => {
                if !SCHEMES.contains(&scheme) {
                    return Err(invalid());
                }
                let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
                let key = percent_decode_str(key)
                    .decode_utf8()
                    .map_err(|_| invalid())?
                    .into_owned();
                (bucket.to_string(), key)
            }
            None => {
                let (bucket, key) = input.split_once('/').ok_or_else(invalid)?;
                (bucket.to_string(), key.to_string())
            }
        };

        if check_bucket(&bucket).is_err() || key.is_empty() || key.ends_with('/') {
            return Err(invalid());
        }

        Ok(Self { bucket, key })
    }

    /// File name component of the key
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Reject bucket names that are empty or could address a parent directory
pub(crate) fn check_bucket(bucket: &str) -> Result<()> {
    if bucket.is_empty()
        || bucket == "."
        || bucket.contains("..")
        || bucket.contains(['/', '\\'])
    {
        return Err(Error::InvalidLocation {
            location: bucket.to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
