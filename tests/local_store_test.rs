use std::io;
use std::time::Duration;

use bytes::Bytes;
use futures::stream;

use semporna::application::ports::{BlobStore, BlobStoreError};
use semporna::domain::StorageKey;
use semporna::infrastructure::storage::LocalBlobStore;

const NO_LIMIT: u64 = 64 * 1024 * 1024;

fn create_test_store() -> (tempfile::TempDir, LocalBlobStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_valid_stream_when_uploading_then_byte_count_is_returned() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/test.txt");

    let chunks = vec![Ok(Bytes::from("hello ")), Ok(Bytes::from("world"))];
    let byte_stream = Box::pin(stream::iter(chunks));

    let size = store.upload(&key, byte_stream, None).await.unwrap();
    assert_eq!(size, 11);
}

#[tokio::test]
async fn given_stored_object_when_downloading_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/test.txt");

    let content = b"test content";
    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from(&content[..]))]));
    store.upload(&key, byte_stream, None).await.unwrap();

    let fetched = store.download(&key, NO_LIMIT).await.unwrap();
    assert_eq!(fetched, content);
}

#[tokio::test]
async fn given_stored_object_when_downloading_over_limit_then_returns_too_large() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/big.bin");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from(vec![0u8; 1024]))]));
    store.upload(&key, byte_stream, None).await.unwrap();

    let result = store.download(&key, 512).await;
    assert!(matches!(result, Err(BlobStoreError::TooLarge { .. })));
}

#[tokio::test]
async fn given_missing_object_when_downloading_then_returns_not_found() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/nonexistent.txt");

    let result = store.download(&key, NO_LIMIT).await;
    assert!(matches!(result, Err(BlobStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_stored_object_when_deleting_then_download_returns_not_found() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/test.txt");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.upload(&key, byte_stream, None).await.unwrap();

    store.delete(&key).await.unwrap();

    let result = store.download(&key, NO_LIMIT).await;
    assert!(matches!(result, Err(BlobStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_stream_error_when_uploading_then_returns_error() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/test.txt");

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "network drop",
        )),
    ];
    let byte_stream = Box::pin(stream::iter(chunks));

    let result = store.upload(&key, byte_stream, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn given_stored_object_when_checking_existence_then_returns_true() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/test.txt");

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.upload(&key, byte_stream, None).await.unwrap();

    assert!(store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn given_missing_object_when_checking_existence_then_returns_false() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/nonexistent.txt");

    assert!(!store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn given_local_backend_when_presigning_then_returns_unsupported() {
    let (_dir, store) = create_test_store();
    let key = StorageKey::from_raw("uploads/test.txt");

    let result = store.presigned_url(&key, Duration::from_secs(60)).await;
    assert!(matches!(
        result,
        Err(BlobStoreError::PresigningUnsupported(_))
    ));
}
