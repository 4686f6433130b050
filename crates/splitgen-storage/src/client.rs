//! S3 client implementation.

use async_trait::async_trait;
use std::path::Path;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::addressing::{BucketAddress, DEFAULT_PUBLIC_HOST};
use crate::error::{StorageError, StorageResult};
use crate::store::BlobStore;

/// Configuration for the S3 client.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket name
    pub bucket_name: String,
    /// Region, resolved from the AWS environment when unset
    pub region: Option<String>,
    /// Custom S3 API endpoint (S3-compatible stores)
    pub endpoint_url: Option<String>,
    /// Host suffix used to build public URLs
    pub public_host: String,
    /// Static access key; the default credential chain is used when unset
    pub access_key_id: Option<String>,
    /// Static secret key
    pub secret_access_key: Option<String>,
}

impl S3Config {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            region: None,
            endpoint_url: None,
            public_host: DEFAULT_PUBLIC_HOST.to_string(),
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            bucket_name: std::env::var("S3_BUCKET_NAME")
                .map_err(|_| StorageError::config_error("S3_BUCKET_NAME not set"))?,
            region: std::env::var("S3_REGION").ok(),
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok(),
            public_host: std::env::var("S3_PUBLIC_HOST")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_HOST.to_string()),
            access_key_id: std::env::var("S3_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY").ok(),
        })
    }

    fn static_credentials(&self) -> StorageResult<Option<Credentials>> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => {
                Ok(Some(Credentials::new(id, secret, None, None, "splitgen-env")))
            }
            (None, None) => Ok(None),
            _ => Err(StorageError::config_error(
                "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set together",
            )),
        }
    }
}

/// S3 blob store.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    address: BucketAddress,
}

impl S3Store {
    /// Create a new client from configuration.
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(ref region) = config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(credentials) = config.static_credentials()? {
            loader = loader.credentials_provider(credentials);
        }
        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint_url.is_some())
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            address: BucketAddress::new(config.bucket_name, config.public_host),
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        let config = S3Config::from_env()?;
        Self::new(config).await
    }

    async fn put_public(
        &self,
        body: ByteStream,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        self.client
            .put_object()
            .bucket(self.address.bucket())
            .key(key)
            .body(body)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(DisplayErrorContext(&e).to_string()))?;

        Ok(self.address.object_url(key))
    }

    /// Check connectivity by performing a head bucket operation.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(self.address.bucket())
            .send()
            .await
            .map_err(|e| {
                StorageError::AwsSdk(format!(
                    "S3 connectivity check failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for S3Store {
    fn bucket(&self) -> &str {
        self.address.bucket()
    }

    fn object_url(&self, key: &str) -> String {
        self.address.object_url(key)
    }

    async fn upload_bytes(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        debug!("Uploading {} bytes to {}", data.len(), key);
        let url = self.put_public(ByteStream::from(data), key, content_type).await?;
        info!(key = %key, "Uploaded object");
        Ok(url)
    }

    async fn upload_file(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        debug!("Uploading {} to {}", path.display(), key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        let url = self.put_public(body, key, content_type).await?;
        info!(key = %key, "Uploaded {}", path.display());
        Ok(url)
    }

    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        debug!("Downloading {}", key);

        let response = self
            .client
            .get_object()
            .bucket(self.address.bucket())
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                if message.contains("NoSuchKey") {
                    StorageError::not_found(key)
                } else {
                    StorageError::download_failed(message)
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::download_failed(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_static_credentials_rejected() {
        let config = S3Config {
            access_key_id: Some("id".to_string()),
            ..S3Config::new("bucket")
        };
        assert!(matches!(
            config.static_credentials(),
            Err(StorageError::ConfigError(_))
        ));
    }

    #[test]
    fn test_default_public_host() {
        let config = S3Config::new("bucket");
        assert_eq!(config.public_host, "amazonaws.com");
        assert!(config.static_credentials().unwrap().is_none());
    }
}
