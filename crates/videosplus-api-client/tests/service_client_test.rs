use mockito::{Matcher, Server};
use reqwest::StatusCode;
use std::time::Duration;
use videosplus_api_client::{ServiceClient, ServiceError};
use videosplus_core::{BootstrapDefaults, MetadataDocument};

fn client_for(server: &Server) -> ServiceClient {
    ServiceClient::new(&server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn health_parses_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"OK","timestamp":"2024-01-01T00:00:00Z"}"#)
        .create_async()
        .await;

    let health = client_for(&server).health().await.unwrap();
    assert!(health.is_ok());
    assert!(health.extra.contains_key("timestamp"));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/site-config")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = client_for(&server).site_config().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn backup_status_reads_camel_case_flag() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/backup/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"hasBackup":true,"lastModified":"2024-01-01"}"#)
        .create_async()
        .await;

    assert!(client_for(&server).backup_status().await.unwrap().has_backup);
}

#[tokio::test]
async fn user_lookup_maps_not_found_to_none() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/api/users/email/admin(%40|@)gmail.com$".to_string()))
        .with_status(404)
        .with_body(r#"{"error":"not found"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.user_by_email("admin@gmail.com").await.unwrap().is_none());
}

#[tokio::test]
async fn status_checks_do_not_fail_on_client_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/signed-url/test-file")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("POST", "/api/upload/videos")
        .match_header("content-type", "application/json")
        .with_status(400)
        .with_body(r#"{"error":"No file uploaded"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    assert_eq!(client.signed_url_status("test-file").await.unwrap(), StatusCode::NOT_FOUND);
    assert_eq!(client.upload_videos_status().await.unwrap(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metadata_upload_is_multipart_with_file_field() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/upload/metadata")
        .match_header(
            "content-type",
            Matcher::Regex("multipart/form-data; boundary=.*".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="videosplus-data.json""#.to_string()),
            Matcher::Regex("admin@gmail.com".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let document = MetadataDocument::bootstrap(BootstrapDefaults::default());
    let status = client_for(&server).upload_metadata(&document).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn metadata_upload_accepts_any_success_body() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/upload/metadata")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("uploaded")
        .create_async()
        .await;
    let client = client_for(&server);
    let document = MetadataDocument::bootstrap(BootstrapDefaults::default());
    assert_eq!(client.upload_metadata(&document).await.unwrap(), StatusCode::OK);
}

#[tokio::test]
async fn metadata_upload_rejection_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/upload/metadata")
        .with_status(413)
        .with_body("payload too large")
        .create_async()
        .await;

    let document = MetadataDocument::bootstrap(BootstrapDefaults::default());
    let err = client_for(&server).upload_metadata(&document).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::PAYLOAD_TOO_LARGE));
}

#[tokio::test]
async fn health_status_must_be_exactly_ok() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let health = client_for(&server).health().await.unwrap();
    assert!(!health.is_ok());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // Port 9 (discard) is not expected to have an HTTP listener.
    let client = ServiceClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = client.health().await.unwrap_err();
    assert!(err.is_transport(), "{:?}", err);
    assert!(matches!(err, ServiceError::Transport { .. }));
}
