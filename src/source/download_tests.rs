//! Tests for `Downloader`.

use super::download::{DownloadError, Downloader, MAX_LIST_BYTES};
use crate::time::InstantSleeper;
use crate::transport::mock::MockClient;
use crate::transport::{HttpError, HttpResponse, RequestSender, RetryPolicy, SendError};
use std::sync::Arc;

const ROUTE: &str = "GET /lite/ipfilter.dat";

fn url() -> url::Url {
    url::Url::parse("https://lists.example.com/lite/ipfilter.dat").unwrap()
}

fn downloader(client: &Arc<MockClient>) -> Downloader<Arc<MockClient>, InstantSleeper> {
    Downloader::new(
        RequestSender::new(Arc::clone(client))
            .with_sleeper(InstantSleeper)
            .with_retry_policy(RetryPolicy::new().with_max_attempts(2)),
    )
}

#[tokio::test]
async fn returns_body_on_success() {
    let client = Arc::new(MockClient::new().on(ROUTE, 200, "1.0.0.0 - 1.0.0.255 , 0 , x\n"));

    let body = downloader(&client).fetch(&url()).await.unwrap();

    assert_eq!(body, b"1.0.0.0 - 1.0.0.255 , 0 , x\n");
    assert_eq!(client.requests()[0].url, url());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let client = Arc::new(MockClient::new().on(ROUTE, 404, "gone"));

    let err = downloader(&client).fetch(&url()).await.unwrap_err();

    assert!(matches!(
        err,
        DownloadError::Request { source: SendError::Failed(_), .. }
    ));
    assert!(err.to_string().contains("lists.example.com"));
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let client = Arc::new(
        MockClient::new()
            .on_response(ROUTE, Err(HttpError::Timeout))
            .on(ROUTE, 200, "ok"),
    );

    let body = downloader(&client).fetch(&url()).await.unwrap();

    assert_eq!(body, b"ok");
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let client = Arc::new(MockClient::new().on(ROUTE, 200, vec![b'x'; 11]));

    let err = downloader(&client)
        .with_max_bytes(10)
        .fetch(&url())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::TooLarge { size: 11, limit: 10, .. }));
}

#[tokio::test]
async fn oversized_content_length_is_rejected_without_retry() {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONTENT_LENGTH, http::HeaderValue::from_static("5000000000"));
    let announced = HttpResponse::new(http::StatusCode::OK, headers, b"1.0.0.0 - 1.0.0.1\n".to_vec());
    let client = Arc::new(MockClient::new().on_response(ROUTE, Ok(announced)));

    let err = downloader(&client).fetch(&url()).await.unwrap_err();

    assert!(matches!(
        err,
        DownloadError::TooLarge { size: 5_000_000_000, limit: MAX_LIST_BYTES, .. }
    ));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn request_carries_size_limit() {
    let client = Arc::new(MockClient::new().on(ROUTE, 200, "ok"));

    downloader(&client).with_max_bytes(1024).fetch(&url()).await.unwrap();

    assert_eq!(client.requests()[0].max_body, Some(1024));
}

#[test]
fn default_limit_is_64_mib() {
    assert_eq!(MAX_LIST_BYTES, 67_108_864);
}
