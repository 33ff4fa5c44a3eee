//! Object storage collaborators
//!
//! The handler reads its input and writes its output through two narrow
//! traits, [`ObjectReader`] and [`ObjectWriter`], so the transform can be
//! exercised against in-memory storage in tests.
//!
//! [`ObjectStorage`] implements both on top of the `object_store` crate
//! (S3, GCS, Azure, local filesystem, in-memory).

mod backend;
mod location;

pub use backend::{ObjectReader, ObjectStorage, ObjectWriter};
pub use location::ObjectLocation;
pub(crate) use location::check_bucket;
