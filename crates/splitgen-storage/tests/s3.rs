//! S3 integration tests.

use splitgen_storage::{key_from_url, BlobStore, S3Store, StorageError, CONTENT_TYPE_MP4};

/// Test bucket reachability.
#[tokio::test]
#[ignore = "requires S3 credentials"]
async fn test_s3_connection() {
    dotenvy::dotenv().ok();

    let store = S3Store::from_env().await.expect("Failed to create S3 store");
    store
        .check_connectivity()
        .await
        .expect("Bucket not reachable");
}

/// Test public upload and fetch-back by URL.
#[tokio::test]
#[ignore = "requires S3 credentials"]
async fn test_upload_and_fetch_by_url() {
    dotenvy::dotenv().ok();

    let store = S3Store::from_env().await.expect("Failed to create S3 store");
    let key = "splits/_integration_check.mp4";

    let url = store
        .upload_bytes(b"integration".to_vec(), key, CONTENT_TYPE_MP4)
        .await
        .expect("Upload failed");
    println!("Uploaded to {}", url);

    assert_eq!(key_from_url(&url).unwrap(), key);
    let bytes = store.get_object_by_url(&url).await.expect("Fetch failed");
    assert_eq!(bytes, b"integration");

    match store.get_object("splits/_missing_object.mp4").await {
        Err(StorageError::NotFound(_)) => {}
        other => panic!("Expected NotFound, got {:?}", other.map(|b| b.len())),
    }
}
