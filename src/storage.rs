use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object store get failed for {key}: {message}")]
    Get { key: String, message: String },

    #[error("object store put failed for {key}: {message}")]
    Put { key: String, message: String },
}

/// Blob-store boundary. `get` returning `None` means the key does not exist,
/// which callers treat as an ordinary condition rather than an error.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn ObjectStore>;

/// S3-backed store. Points at AWS by default; set `S3_ENDPOINT` to target a
/// MinIO-style server, which also switches to path-style addressing.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn from_env() -> Self {
        let bucket =
            env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "brand-insights-bucket".to_string());
        let endpoint = env::var("S3_ENDPOINT").ok();

        let region_provider =
            RegionProviderChain::default_provider().or_else(Region::new("us-east-1"));
        let mut loader = aws_config::from_env().region(region_provider);
        if let Some(ref endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&config);
        if endpoint.is_some() {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        let store = Self { client, bucket };
        store.ensure_bucket().await;
        store
    }

    /// Best-effort startup check. A missing bucket is created when possible;
    /// anything else is logged and left for the first real put to surface.
    async fn ensure_bucket(&self) {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => debug!("bucket '{}' exists", self.bucket),
            Err(e) => {
                let is_not_found = e.into_service_error().is_not_found();
                if is_not_found {
                    warn!("bucket '{}' not found, creating", self.bucket);
                    if let Err(create_err) =
                        self.client.create_bucket().bucket(&self.bucket).send().await
                    {
                        warn!("failed to create bucket '{}': {}", self.bucket, create_err);
                    }
                } else {
                    warn!("could not verify bucket '{}'", self.bucket);
                }
            }
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let data = output.body.collect().await.map_err(|e| StoreError::Get {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                Ok(Some(data.into_bytes().to_vec()))
            }
            Err(e) => {
                if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                    Ok(None)
                } else {
                    Err(StoreError::Get {
                        key: key.to_string(),
                        message: e.to_string(),
                    })
                }
            }
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::Put {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
