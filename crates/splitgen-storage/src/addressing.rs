//! Public object URLs.
//!
//! Objects are addressed as `https://<bucket>.s3.<host>/<key>`. The key is
//! recovered from a URL by stripping the leading slash of its path; the
//! path is not percent-decoded.

use url::Url;

use crate::error::{StorageError, StorageResult};

/// Default public host suffix.
pub const DEFAULT_PUBLIC_HOST: &str = "amazonaws.com";

/// Builds public URLs for one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketAddress {
    bucket: String,
    host: String,
}

impl BucketAddress {
    pub fn new(bucket: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            host: host.into().trim_matches('.').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public URL of `key`.
    pub fn object_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}/{}",
            self.bucket,
            self.host,
            key.trim_start_matches('/')
        )
    }
}

/// Storage key addressed by a public object URL.
pub fn key_from_url(url: &str) -> StorageResult<String> {
    Url::parse(url).map_err(|e| StorageError::invalid_url(format!("{}: {}", url, e)))?;

    // Url::path() re-encodes; keys are taken from the raw text.
    let after_scheme = url.split_once("://").map_or("", |(_, rest)| rest);
    let path = after_scheme.find('/').map_or("", |i| &after_scheme[i..]);
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let key = path.trim_start_matches('/');
    if key.is_empty() {
        return Err(StorageError::invalid_url(format!("{}: no object key", url)));
    }
    Ok(key.to_string())
}

/// Bucket addressed by a public object URL (first label of the host).
pub fn bucket_from_url(url: &str) -> StorageResult<String> {
    let parsed = Url::parse(url).map_err(|e| StorageError::invalid_url(format!("{}: {}", url, e)))?;
    parsed
        .host_str()
        .and_then(|host| host.split('.').next())
        .filter(|bucket| !bucket.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StorageError::invalid_url(format!("{}: no bucket host", url)))
}

/// Whether `location` looks like a bucket object URL rather than a local path.
pub fn is_object_url(location: &str) -> bool {
    match Url::parse(location) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| h.contains(".s3."))
        }
        Err(_) => false,
    }
}
