//! `object_store`-backed reader and writer

use super::location::{check_bucket, ObjectLocation};
use crate::config::StorageBackend;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Fetches raw object bytes
#[async_trait]
pub trait ObjectReader: Send + Sync {
    /// Read the whole object at `location`
    async fn get(&self, location: &ObjectLocation) -> Result<Bytes>;
}

/// Persists object bytes
#[async_trait]
pub trait ObjectWriter: Send + Sync {
    /// Write `data` to `location`, replacing any existing object
    async fn put(&self, location: &ObjectLocation, data: Bytes) -> Result<()>;
}

/// Object storage for one backend kind, holding one store handle per bucket
///
/// Handles are created on first use and cached for the life of the value.
pub struct ObjectStorage {
    backend: StorageBackend,
    stores: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl std::fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl ObjectStorage {
    /// Create storage for the given backend
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// In-memory storage (buckets are independent, nothing is persisted)
    pub fn in_memory() -> Self {
        Self::new(StorageBackend::Memory)
    }

    /// Local filesystem storage; each bucket is a directory under `root`
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(StorageBackend::Local { root: root.into() })
    }

    /// Backend kind
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Get or create the store handle for a bucket
    async fn store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        check_bucket(bucket)?;

        if let Some(store) = self.stores.read().await.get(bucket) {
            return Ok(Arc::clone(store));
        }

        let mut stores = self.stores.write().await;
        if let Some(store) = stores.get(bucket) {
            return Ok(Arc::clone(store));
        }

        debug!(bucket, backend = self.backend.name(), "Creating object store");
        let store = self.build_store(bucket)?;
        stores.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }

    fn build_store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        match &self.backend {
            StorageBackend::S3 { endpoint, region } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(endpoint) = endpoint {
                    builder = builder
                        .with_allow_http(endpoint.starts_with("http://"))
                        .with_endpoint(endpoint);
                }
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;
                Ok(Arc::new(store))
            }
            StorageBackend::Gcs => {
                let store = GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;
                Ok(Arc::new(store))
            }
            StorageBackend::Azure => {
                let store = MicrosoftAzureBuilder::from_env()
                    .with_container_name(bucket)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;
                Ok(Arc::new(store))
            }
            StorageBackend::Local { root } => {
                let dir = root.join(bucket);
                std::fs::create_dir_all(&dir).map_err(|e| {
                    Error::config(format!("Failed to create directory {}: {e}", dir.display()))
                })?;
                let store = LocalFileSystem::new_with_prefix(&dir)
                    .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;
                Ok(Arc::new(store))
            }
            StorageBackend::Memory => Ok(Arc::new(InMemory::new())),
        }
    }
}

#[async_trait]
impl ObjectReader for ObjectStorage {
    async fn get(&self, location: &ObjectLocation) -> Result<Bytes> {
        let store = self.store(&location.bucket).await?;
        let path = ObjectPath::from(location.key.as_str());

        let result = store
            .get(&path)
            .await
            .map_err(|e| map_store_error(location, e))?;
        let data = result
            .bytes()
            .await
            .map_err(|e| map_store_error(location, e))?;

        debug!(%location, size = data.len(), "Read object");
        Ok(data)
    }
}

#[async_trait]
impl ObjectWriter for ObjectStorage {
    async fn put(&self, location: &ObjectLocation, data: Bytes) -> Result<()> {
        let store = self.store(&location.bucket).await?;
        let path = ObjectPath::from(location.key.as_str());
        let size = data.len();

        store
            .put(&path, data.into())
            .await
            .map_err(|e| map_store_error(location, e))?;

        debug!(%location, size, "Wrote object");
        Ok(())
    }
}

/// Classify an `object_store` error for a location
fn map_store_error(location: &ObjectLocation, err: object_store::Error) -> Error {
    match err {
        object_store::Error::NotFound { .. } => Error::ObjectNotFound {
            location: location.to_string(),
        },
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => Error::AccessDenied {
            location: location.to_string(),
        },
        other => Error::storage(format!("{location}: {other}")),
    }
}

#[cfg(test)]
mod error_mapping_tests {
    use super::*;

    fn source() -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
    }

    #[test]
    fn test_not_found_maps_to_object_not_found() {
        let location = ObjectLocation::new("raw", "a.json");
        let err = object_store::Error::NotFound {
            path: "a.json".to_string(),
            source: source(),
        };
        assert!(matches!(
            map_store_error(&location, err),
            Error::ObjectNotFound { location } if location == "raw/a.json"
        ));
    }

    #[test]
    fn test_permission_denied_maps_to_access_denied() {
        let location = ObjectLocation::new("raw", "a.json");
        let err = object_store::Error::PermissionDenied {
            path: "a.json".to_string(),
            source: source(),
        };
        assert!(matches!(
            map_store_error(&location, err),
            Error::AccessDenied { .. }
        ));

        let err = object_store::Error::Unauthenticated {
            path: "a.json".to_string(),
            source: source(),
        };
        assert!(matches!(
            map_store_error(&location, err),
            Error::AccessDenied { .. }
        ));
    }

    #[test]
    fn test_other_errors_map_to_storage() {
        let location = ObjectLocation::new("raw", "a.json");
        let err = object_store::Error::Generic {
            store: "S3",
            source: source(),
        };
        assert!(matches!(
            map_store_error(&location, err),
            Error::Storage { .. }
        ));
    }
}
