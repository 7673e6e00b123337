use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use bucket_gallery::{
    adapters::inbound::http::{
        router::{create_router, AppState},
        views::Views,
    },
    domain::{
        errors::{StorageError, StorageResult},
        models::{ListingEntry, ObjectBody, ObjectStat},
    },
    AppBuilder, AppServices, BucketName, GalleryService, GalleryServiceImpl, ObjectKey,
    ObjectStore,
};
use bytes::Bytes;
use futures::{stream, stream::BoxStream, StreamExt};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

fn bucket() -> BucketName {
    BucketName::new("gallery".to_string()).unwrap()
}

async fn setup_test_server() -> (TestServer, AppServices) {
    setup_test_server_with_limit(1024 * 1024).await
}

async fn setup_test_server_with_limit(max_upload_bytes: usize) -> (TestServer, AppServices) {
    let services = AppBuilder::new(bucket())
        .with_max_upload_bytes(max_upload_bytes)
        .build()
        .unwrap();
    services.bootstrap().await.unwrap();

    let server = TestServer::new(services.router().unwrap()).unwrap();
    (server, services)
}

fn file_form(file_name: &str, mime_type: &str, data: impl Into<Bytes>) -> MultipartForm {
    let part = Part::bytes(data.into())
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part("file", part)
}

async fn upload(server: &TestServer, file_name: &str, mime_type: &str, data: &'static [u8]) {
    let response = server
        .post("/upload")
        .multipart(file_form(file_name, mime_type, data))
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/");
}

async fn listing(services: &AppServices) -> Vec<ListingEntry> {
    services.gallery_service.list_objects().await.unwrap()
}

#[tokio::test]
async fn test_upload_then_list_and_download() {
    let (server, services) = setup_test_server().await;

    upload(&server, "notes.txt", "text/plain", b"hello gallery").await;

    let objects = listing(&services).await;
    assert_eq!(objects.len(), 1);
    assert!(objects[0].key.ends_with("-notes.txt"));
    assert_eq!(objects[0].size, 13);

    let index = server.get("/").await;
    index.assert_status_ok();
    assert!(index.text().contains(&objects[0].key));

    let download = server.get(&format!("/download/{}", objects[0].key)).await;
    download.assert_status_ok();
    assert_eq!(download.header("content-type"), "text/plain");
    assert!(download
        .header("content-disposition")
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    assert_eq!(download.as_bytes().as_ref(), b"hello gallery");
}

#[tokio::test]
async fn test_same_file_name_gets_distinct_keys() {
    let (server, services) = setup_test_server().await;

    upload(&server, "cat.png", "image/png", b"first").await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    upload(&server, "cat.png", "image/png", b"second").await;

    let objects = listing(&services).await;
    assert_eq!(objects.len(), 2);
    assert_ne!(objects[0].key, objects[1].key);

    for object in &objects {
        server
            .get(&format!("/download/{}", object.key))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_delete_removes_object() {
    let (server, services) = setup_test_server().await;

    upload(&server, "notes.txt", "text/plain", b"short lived").await;
    let key = listing(&services).await[0].key.clone();

    let response = server
        .post("/delete")
        .form(&[("objectName", key.as_str())])
        .await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/");

    assert!(listing(&services).await.is_empty());
}

#[tokio::test]
async fn test_delete_unknown_object_still_redirects() {
    let (server, _services) = setup_test_server().await;

    let response = server
        .post("/delete")
        .form(&[("objectName", "1700000000000-missing.png")])
        .await;
    response.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_delete_without_object_name() {
    let (server, services) = setup_test_server().await;
    upload(&server, "notes.txt", "text/plain", b"keep me").await;

    let response = server.post("/delete").form(&[("objectName", "")]).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Object name is required"));

    let response = server.post("/delete").form(&[("somethingElse", "x")]).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(listing(&services).await.len(), 1);
}

#[tokio::test]
async fn test_delete_without_form_body() {
    let (server, services) = setup_test_server().await;
    upload(&server, "notes.txt", "text/plain", b"keep me").await;

    let response = server.post("/delete").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("Object name is required"));

    assert_eq!(listing(&services).await.len(), 1);
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let (server, services) = setup_test_server().await;

    let form = MultipartForm::new().add_text("comment", "no file here");
    let response = server.post("/upload").multipart(form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("No file uploaded"));

    // A file input left empty arrives with an empty filename
    let response = server
        .post("/upload")
        .multipart(file_form("", "application/octet-stream", Bytes::new()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert!(listing(&services).await.is_empty());
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let (server, services) = setup_test_server_with_limit(1024).await;

    let response = server
        .post("/upload")
        .multipart(file_form("big.bin", "application/octet-stream", vec![7u8; 4096]))
        .await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    assert!(listing(&services).await.is_empty());
}

#[tokio::test]
async fn test_preview_image() {
    let (server, services) = setup_test_server().await;

    upload(&server, "pixel.png", "image/png", b"\x89PNG\r\n\x1a\nfake").await;
    let key = listing(&services).await[0].key.clone();

    let response = server.get(&format!("/preview/{}", key)).await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert!(response.maybe_header("content-disposition").is_none());
    assert_eq!(response.as_bytes().as_ref(), b"\x89PNG\r\n\x1a\nfake");
}

#[tokio::test]
async fn test_preview_non_image() {
    let (server, services) = setup_test_server().await;

    upload(&server, "notes.txt", "text/plain", b"not a picture").await;
    let key = listing(&services).await[0].key.clone();

    let response = server.get(&format!("/preview/{}", key)).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("File is not an image");
}

#[tokio::test]
async fn test_preview_missing_object() {
    let (server, _services) = setup_test_server().await;

    let response = server.get("/preview/1700000000000-missing.png").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_text("Image not found");
}

#[tokio::test]
async fn test_download_missing_object_is_server_error() {
    let (server, _services) = setup_test_server().await;

    let response = server.get("/download/1700000000000-missing.png").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upload_with_double_slash_in_name() {
    let (server, services) = setup_test_server().await;

    upload(&server, "a//b.png", "image/png", b"png bytes").await;

    let objects = listing(&services).await;
    assert_eq!(objects.len(), 1);

    let path = format!("/download/{}", urlencoding::encode(&objects[0].key));
    let download = server.get(&path).await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), b"png bytes");
}

#[tokio::test]
async fn test_upload_defaults_content_type() {
    let (server, services) = setup_test_server().await;

    let part = Part::bytes(Bytes::from_static(b"raw bytes")).file_name("blob");
    let response = server
        .post("/upload")
        .multipart(MultipartForm::new().add_part("file", part))
        .await;
    response.assert_status(StatusCode::FOUND);

    let key = listing(&services).await[0].key.clone();
    let download = server.get(&format!("/download/{}", key)).await;
    assert_eq!(download.header("content-type"), "application/octet-stream");
}

#[tokio::test]
async fn test_listing_omits_empty_objects() {
    let (server, services) = setup_test_server().await;

    upload(&server, "empty.txt", "text/plain", b"").await;
    upload(&server, "full.txt", "text/plain", b"content").await;

    let objects = listing(&services).await;
    assert_eq!(objects.len(), 1);
    assert!(objects[0].key.ends_with("-full.txt"));

    let index = server.get("/").await;
    assert!(!index.text().contains("-empty.txt"));
}

/// Store that lists one object and then loses its connection
struct BrokenStore;

fn unavailable() -> StorageError {
    StorageError::infrastructure("store unavailable", "connection reset by peer")
}

#[async_trait]
impl ObjectStore for BrokenStore {
    fn list_objects(&self) -> BoxStream<'_, StorageResult<ListingEntry>> {
        stream::iter(vec![
            Ok(ListingEntry {
                key: "1700000000000-cat.png".to_string(),
                size: 10,
            }),
            Err(unavailable()),
        ])
        .boxed()
    }

    async fn put_object(
        &self,
        _key: &ObjectKey,
        _data: Bytes,
        _content_type: Option<&str>,
    ) -> StorageResult<()> {
        Err(unavailable())
    }

    async fn stat_object(&self, _key: &ObjectKey) -> StorageResult<ObjectStat> {
        Err(unavailable())
    }

    async fn get_object(&self, _key: &ObjectKey) -> StorageResult<ObjectBody> {
        Err(unavailable())
    }

    async fn remove_object(&self, _key: &ObjectKey) -> StorageResult<()> {
        Err(unavailable())
    }
}

fn broken_server() -> TestServer {
    let state = AppState {
        gallery: Arc::new(GalleryServiceImpl::new(Arc::new(BrokenStore), bucket())),
        views: Arc::new(Views::new().unwrap()),
    };
    TestServer::new(create_router(state, 1024 * 1024)).unwrap()
}

#[tokio::test]
async fn test_store_failures_render_error_page() {
    let server = broken_server();

    let response = server.get("/").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header("content-type"), "text/html; charset=utf-8");

    server
        .post("/upload")
        .multipart(file_form("cat.png", "image/png", Bytes::from_static(b"png")))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server
        .post("/delete")
        .form(&[("objectName", "1700000000000-cat.png")])
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server
        .get("/download/1700000000000-cat.png")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server
        .get("/preview/1700000000000-cat.png")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

/// Store holding one object whose body breaks after the first chunk
struct TruncatingStore;

fn truncated_key() -> ObjectKey {
    ObjectKey::new("1700000000000-big.bin".to_string()).unwrap()
}

#[async_trait]
impl ObjectStore for TruncatingStore {
    fn list_objects(&self) -> BoxStream<'_, StorageResult<ListingEntry>> {
        stream::empty().boxed()
    }

    async fn put_object(
        &self,
        _key: &ObjectKey,
        _data: Bytes,
        _content_type: Option<&str>,
    ) -> StorageResult<()> {
        Err(unavailable())
    }

    async fn stat_object(&self, key: &ObjectKey) -> StorageResult<ObjectStat> {
        Ok(ObjectStat {
            key: key.clone(),
            size: 1024,
            content_type: Some("application/octet-stream".to_string()),
        })
    }

    async fn get_object(&self, _key: &ObjectKey) -> StorageResult<ObjectBody> {
        Ok(stream::iter(vec![
            Ok(Bytes::from_static(b"first chunk")),
            Err(unavailable()),
        ])
        .boxed())
    }

    async fn remove_object(&self, _key: &ObjectKey) -> StorageResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_download_stream_error_ends_body() {
    let state = AppState {
        gallery: Arc::new(GalleryServiceImpl::new(Arc::new(TruncatingStore), bucket())),
        views: Arc::new(Views::new().unwrap()),
    };
    let app = create_router(state, 1024 * 1024);

    let request = Request::builder()
        .uri(format!("/download/{}", truncated_key()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    // Headers are already out when the store fails, so the body carries the error
    assert_eq!(response.status(), StatusCode::OK);
    let body = tokio::time::timeout(
        Duration::from_secs(5),
        to_bytes(response.into_body(), usize::MAX),
    )
    .await
    .expect("body finishes instead of hanging");
    assert!(body.is_err());
}
