use std::sync::Arc;

use boib_logging::boib_debug;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};

use super::{validate_relative, StorageError, StorageSink};

/// Connection settings for an S3-compatible bucket.
///
/// Unset fields fall back to the standard `AWS_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Stores documents as objects, optionally below a key prefix.
#[derive(Debug, Clone)]
pub struct ObjectStoreSink {
    store: Arc<dyn ObjectStore>,
    prefix: Option<String>,
}

impl ObjectStoreSink {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: Option<&str>) -> Self {
        let prefix = prefix
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty());
        Self { store, prefix }
    }

    pub fn from_s3(settings: &S3Settings) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(&settings.bucket);
        if let Some(region) = settings.region.as_deref() {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = settings.endpoint.as_deref() {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        if let Some(key) = settings.access_key_id.as_deref() {
            builder = builder.with_access_key_id(key);
        }
        if let Some(secret) = settings.secret_access_key.as_deref() {
            builder = builder.with_secret_access_key(secret);
        }
        let store = builder.build()?;
        Ok(Self::new(Arc::new(store), settings.prefix.as_deref()))
    }

    /// Object key for a relative document path.
    pub fn key(&self, path: &str) -> String {
        match self.prefix.as_deref() {
            Some(prefix) => format!("{prefix}/{path}"),
            None => path.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl StorageSink for ObjectStoreSink {
    async fn write(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        validate_relative(path)?;
        let key = self.key(path);
        let location = ObjectPath::parse(&key).map_err(|_| StorageError::InvalidPath(key.clone()))?;
        self.store
            .put(&location, PutPayload::from(content.to_vec()))
            .await?;
        boib_debug!("stored object {}", key);
        Ok(())
    }
}
