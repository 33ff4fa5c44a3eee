//! S3-style object-created event notifications

use crate::error::{Error, Result};
use crate::storage::{check_bucket, ObjectLocation};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Characters escaped when building an event key
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Object-created notification delivered to the handler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// A single notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,

    pub s3: EventS3,
}

/// Bucket and object of a notification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventS3 {
    pub bucket: EventBucket,
    pub object: EventObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventObject {
    /// URL-encoded object key (`+` stands for a space)
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl StorageEvent {
    /// Parse an event from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::invalid_event(format!("Failed to parse event: {e}")))
    }

    /// Build a single-record event for a location
    pub fn for_location(location: &ObjectLocation) -> Self {
        let key = utf8_percent_encode(&location.key, KEY_ENCODE_SET).to_string();
        Self {
            records: vec![EventRecord {
                event_name: Some("ObjectCreated:Put".to_string()),
                s3: EventS3 {
                    bucket: EventBucket {
                        name: location.bucket.clone(),
                    },
                    object: EventObject { key, size: None },
                },
            }],
        }
    }

    /// Decode the object locations named by this event, in record order
    pub fn locations(&self) -> Result<Vec<ObjectLocation>> {
        if self.records.is_empty() {
            return Err(Error::invalid_event("event contains no records"));
        }

        self.records.iter().map(EventRecord::location).collect()
    }
}

impl EventRecord {
    /// Decoded object location of this record
    pub fn location(&self) -> Result<ObjectLocation> {
        let bucket = self.s3.bucket.name.trim();
        if bucket.is_empty() {
            return Err(Error::invalid_event("record has an empty bucket name"));
        }
        check_bucket(bucket)
            .map_err(|_| Error::invalid_event(format!("invalid bucket name '{bucket}'")))?;

        let key = decode_key(&self.s3.object.key)?;
        if key.is_empty() {
            return Err(Error::invalid_event("record has an empty object key"));
        }

        Ok(ObjectLocation::new(bucket, key))
    }
}

/// Decode an event object key: `+` is a space, then percent-decoding
fn decode_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| Error::invalid_event(format!("object key is not valid UTF-8: {e}")))
}
