use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use docpipe::application::ports::{ObjectStorage, StorageError};
use docpipe::application::services::StorageService;
use docpipe::domain::{
    BatchDestination, DestinationKind, DestinationParams, ErrorKind, PersistedLocation,
};
use docpipe::infrastructure::storage::InMemoryObjectStorage;

/// Rejects any key containing "reject", stores everything else in memory.
struct RejectingStorage {
    inner: InMemoryObjectStorage,
}

#[async_trait::async_trait]
impl ObjectStorage for RejectingStorage {
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StorageError> {
        self.inner.get(bucket, key).await
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
    ) -> Result<PersistedLocation, StorageError> {
        if key.contains("reject") {
            return Err(StorageError::UploadFailed(format!("{bucket}/{key} refused")));
        }
        self.inner.put(bucket, key, data).await
    }
}

fn batch(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(content, name)| (content.to_string(), name.to_string()))
        .collect()
}

#[tokio::test]
async fn given_no_directory_when_saving_local_then_writes_to_output_dir() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("output");
    let service = StorageService::new(&output_dir, None, None);

    let location = service
        .save("conteúdo", "a.txt", DestinationKind::Local, DestinationParams::default())
        .await
        .unwrap();

    let expected = output_dir.join("a.txt");
    assert_eq!(location.as_str(), expected.to_string_lossy());
    assert_eq!(std::fs::read_to_string(expected).unwrap(), "conteúdo");
}

#[tokio::test]
async fn given_nested_directory_when_saving_local_then_creates_it() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("x").join("y");
    let service = StorageService::new(dir.path(), None, None);

    service
        .save("data", "b.json", DestinationKind::Local, DestinationParams::directory(&target))
        .await
        .unwrap();

    assert!(target.join("b.json").is_file());
}

#[tokio::test]
async fn given_network_path_without_directory_when_saving_then_returns_invalid_input() {
    let dir = TempDir::new().unwrap();
    let service = StorageService::new(dir.path(), None, None);

    let err = service
        .save("data", "a.txt", DestinationKind::NetworkPath, DestinationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::InvalidInput(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn given_network_path_with_directory_when_saving_then_writes_file() {
    let dir = TempDir::new().unwrap();
    let share = dir.path().join("share");
    let service = StorageService::new(dir.path(), None, None);

    let location = service
        .save("data", "a.txt", DestinationKind::NetworkPath, DestinationParams::directory(&share))
        .await
        .unwrap();

    assert_eq!(location.as_str(), share.join("a.txt").to_string_lossy());
}

#[tokio::test]
async fn given_s3_without_bucket_when_saving_then_returns_invalid_input() {
    let storage: Arc<dyn ObjectStorage> = Arc::new(InMemoryObjectStorage::new());
    let service = StorageService::new("output", Some(storage), None);
    let params = DestinationParams {
        object_key: Some("k".to_string()),
        ..DestinationParams::default()
    };

    let err = service
        .save("data", "a.txt", DestinationKind::S3, params)
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::InvalidInput(ref m) if m.contains("s3")));
}

#[tokio::test]
async fn given_unconfigured_s3_when_saving_then_returns_missing_credentials() {
    let service = StorageService::new("output", None, None);

    let err = service
        .save("data", "a.txt", DestinationKind::S3, DestinationParams::s3("bucket", "a.txt"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingCredentials);
}

#[tokio::test]
async fn given_unconfigured_azure_when_saving_then_returns_missing_credentials() {
    let service = StorageService::new("output", None, None);

    let err = service
        .save("data", "a.txt", DestinationKind::Azure, DestinationParams::azure("docs", "a.txt"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingCredentials);
}

#[tokio::test]
async fn given_configured_azure_when_saving_then_stores_blob() {
    let memory = Arc::new(InMemoryObjectStorage::new());
    let azure: Arc<dyn ObjectStorage> = memory.clone();
    let service = StorageService::new("output", None, Some(azure));

    let location = service
        .save("data", "a.txt", DestinationKind::Azure, DestinationParams::azure("docs", "out/a.txt"))
        .await
        .unwrap();

    assert_eq!(location.as_str(), "memory://docs/out/a.txt");
    assert_eq!(memory.get("docs", "out/a.txt").await.unwrap(), Bytes::from("data"));
}

#[tokio::test]
async fn given_prefix_when_saving_batch_to_s3_then_keys_are_prefixed() {
    let memory = Arc::new(InMemoryObjectStorage::new());
    let s3: Arc<dyn ObjectStorage> = memory.clone();
    let service = StorageService::new("output", Some(s3), None);
    let destination = BatchDestination {
        bucket: Some("bucket".to_string()),
        prefix: Some("prefix".to_string()),
        ..BatchDestination::default()
    };

    let saved = service
        .save_multiple_files(batch(&[("1", "one.json"), ("2", "two.json")]), DestinationKind::S3, &destination)
        .await;

    let locations: Vec<&str> = saved.iter().map(PersistedLocation::as_str).collect();
    assert_eq!(
        locations,
        vec!["memory://bucket/prefix/one.json", "memory://bucket/prefix/two.json"]
    );
    assert_eq!(memory.len(), 2);
}

#[tokio::test]
async fn given_failing_second_upload_when_saving_batch_then_returns_other_two_in_order() {
    let s3: Arc<dyn ObjectStorage> = Arc::new(RejectingStorage {
        inner: InMemoryObjectStorage::new(),
    });
    let service = StorageService::new("output", Some(s3), None);
    let destination = BatchDestination {
        bucket: Some("bucket".to_string()),
        ..BatchDestination::default()
    };

    let saved = service
        .save_multiple_files(
            batch(&[("1", "first.txt"), ("2", "reject.txt"), ("3", "third.txt")]),
            DestinationKind::S3,
            &destination,
        )
        .await;

    let locations: Vec<&str> = saved.iter().map(PersistedLocation::as_str).collect();
    assert_eq!(
        locations,
        vec!["memory://bucket/first.txt", "memory://bucket/third.txt"]
    );
}

#[tokio::test]
async fn given_name_colliding_with_directory_when_saving_local_batch_then_skips_it() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("two.txt")).unwrap();
    let service = StorageService::new(dir.path(), None, None);
    let destination = BatchDestination {
        directory: Some(dir.path().to_path_buf()),
        ..BatchDestination::default()
    };

    let saved = service
        .save_multiple_files(
            batch(&[("1", "one.txt"), ("2", "two.txt"), ("3", "three.txt")]),
            DestinationKind::Local,
            &destination,
        )
        .await;

    assert_eq!(saved.len(), 2);
    assert!(saved[0].as_str().ends_with("one.txt"));
    assert!(saved[1].as_str().ends_with("three.txt"));
}

#[tokio::test]
async fn given_batch_without_bucket_when_saving_to_s3_then_returns_empty() {
    let s3: Arc<dyn ObjectStorage> = Arc::new(InMemoryObjectStorage::new());
    let service = StorageService::new("output", Some(s3), None);

    let saved = service
        .save_multiple_files(batch(&[("1", "one.txt")]), DestinationKind::S3, &BatchDestination::default())
        .await;

    assert!(saved.is_empty());
}
