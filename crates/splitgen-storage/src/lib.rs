//! Blob storage for variants and archives.
//!
//! This crate provides:
//! - The [`BlobStore`] trait the pipeline depends on
//! - An S3 implementation with public-read uploads
//! - An in-memory implementation for tests and local runs
//! - Public URL ↔ object key addressing

pub mod addressing;
pub mod client;
pub mod error;
pub mod memory;
pub mod store;

pub use addressing::{bucket_from_url, is_object_url, key_from_url, BucketAddress};
pub use client::{S3Config, S3Store};
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use store::{BlobStore, CONTENT_TYPE_MP4, CONTENT_TYPE_ZIP};
