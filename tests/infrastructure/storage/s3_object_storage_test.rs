use std::sync::{Arc, Mutex};

use axum::body::Bytes as BodyBytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::put;
use axum::Router;
use bytes::Bytes;

use docpipe::application::ports::{ObjectStorage, StorageError};
use docpipe::domain::ErrorKind;
use docpipe::infrastructure::storage::{S3Credentials, S3ObjectStorage};

use crate::helpers::mock_server::MockServer;

#[derive(Clone, Default)]
struct S3Uploads(Arc<Mutex<Vec<(String, String, Option<String>, Vec<u8>)>>>);

async fn put_object(
    State(uploads): State<S3Uploads>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
    body: BodyBytes,
) -> impl IntoResponse {
    if key.contains("fail") {
        return (StatusCode::FORBIDDEN, [("etag", "\"none\"")], "AccessDenied");
    }
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    uploads
        .0
        .lock()
        .unwrap()
        .push((bucket, key, content_type, body.to_vec()));
    (StatusCode::OK, [("etag", "\"etag-1\"")], "")
}

async fn get_object(Path((_bucket, key)): Path<(String, String)>) -> impl IntoResponse {
    if key == "reports/a.txt" {
        (
            StatusCode::OK,
            [
                ("etag", "\"etag-1\""),
                ("last-modified", "Tue, 15 Nov 1994 12:45:26 GMT"),
            ],
            "conteúdo remoto",
        )
    } else {
        (StatusCode::NOT_FOUND, [("etag", "\"none\""), ("last-modified", "Tue, 15 Nov 1994 12:45:26 GMT")], "")
    }
}

/// Path-style S3 endpoint: `/{bucket}/{key}`. Keys containing `fail` are rejected.
async fn start_s3() -> (MockServer, S3Uploads) {
    let uploads = S3Uploads::default();
    let router = Router::new()
        .route("/{bucket}/{*key}", put(put_object).get(get_object))
        .with_state(uploads.clone());
    (MockServer::start(router).await, uploads)
}

fn s3_storage(server: &MockServer) -> S3ObjectStorage {
    S3ObjectStorage::new(S3Credentials {
        access_key_id: "AKID".to_string(),
        secret_access_key: "secret".to_string(),
        session_token: None,
        region: "us-east-1".to_string(),
        endpoint: Some(server.base_url.clone()),
    })
}

#[tokio::test]
async fn given_text_payload_when_putting_then_uploads_with_plain_text_content_type() {
    let (server, uploads) = start_s3().await;
    let storage = s3_storage(&server);

    let location = storage
        .put("docs", "reports/a.json", Bytes::from_static(b"{}"))
        .await
        .unwrap();

    assert_eq!(location.as_str(), "s3://docs/reports/a.json");
    let uploads = uploads.0.lock().unwrap();
    let (bucket, key, content_type, body) = &uploads[0];
    assert_eq!(bucket, "docs");
    assert_eq!(key, "reports/a.json");
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, b"{}");
}

#[tokio::test]
async fn given_rejected_upload_when_putting_then_returns_io_error() {
    let (server, _uploads) = start_s3().await;
    let storage = s3_storage(&server);

    let err = storage
        .put("docs", "fail.txt", Bytes::from_static(b"x"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::UploadFailed(_)));
    assert_eq!(err.kind(), ErrorKind::IoError);
}

#[tokio::test]
async fn given_existing_object_when_getting_then_returns_body() {
    let (server, _uploads) = start_s3().await;
    let storage = s3_storage(&server);

    let bytes = storage.get("docs", "reports/a.txt").await.unwrap();

    assert_eq!(bytes, "conteúdo remoto".as_bytes());
}

#[tokio::test]
async fn given_missing_object_when_getting_then_returns_not_found() {
    let (server, _uploads) = start_s3().await;
    let storage = s3_storage(&server);

    let err = storage.get("docs", "reports/missing.txt").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn given_empty_bucket_name_when_putting_then_returns_invalid_input() {
    let (server, _uploads) = start_s3().await;
    let storage = s3_storage(&server);

    let err = storage.put("", "a.txt", Bytes::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}
