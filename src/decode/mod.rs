//! Input decoding
//!
//! Turns raw invocation input into typed values:
//! - `parse_orders` - order-list document bytes into [`crate::types::Order`]s
//! - `StorageEvent` - S3-style object-created notifications into object locations
//!
//! Structural problems are reported here, at parse time, so the flattener
//! itself only ever sees well-formed orders.

mod event;
mod orders;

pub use event::{EventBucket, EventObject, EventRecord, EventS3, StorageEvent};
pub use orders::parse_orders;
