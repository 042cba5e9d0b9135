mod common;

use common::mock_service::{MockResponse, MockService};
use docsum_core::config::ApiConfig;
use docsum_core::contract::{BinaryArtifact, DownloadSink, Exporter};
use docsum_core::error::WorkflowError;
use docsum_core::export::{DirectorySink, ExportClient, EXPORT_FILENAME};
use tempfile::tempdir;

#[tokio::test]
async fn posts_summary_as_json_and_returns_raw_bytes() {
    let service = MockService::start().await;
    let docx = b"PK\x03\x04 not really a docx";
    service.enqueue(MockResponse::binary(docx)).await;
    let client = ExportClient::new(&ApiConfig::new(service.base_url()));

    let artifact = client.export_summary("A brief text.").await.unwrap();
    assert_eq!(artifact.bytes, docx.to_vec());
    assert_eq!(
        artifact.content_type.as_deref(),
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
    );

    let requests = service.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/download");
    assert!(requests[0].content_type.starts_with("application/json"));
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, serde_json::json!({ "summary": "A brief text." }));
}

#[tokio::test]
async fn error_status_is_export_failure() {
    let service = MockService::start().await;
    service.enqueue(MockResponse::status(502, "bad gateway")).await;
    let client = ExportClient::new(&ApiConfig::new(service.base_url()));

    let err = client.export_summary("text").await.unwrap_err();
    assert!(matches!(err, WorkflowError::ExportFailed(_)));
    assert_eq!(err.to_string(), "Failed to download summary.");
}

#[tokio::test]
async fn directory_sink_keeps_every_download() {
    let dir = tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());

    let first = sink
        .deliver(EXPORT_FILENAME, &BinaryArtifact::new(b"one".to_vec()))
        .await
        .unwrap();
    let second = sink
        .deliver(EXPORT_FILENAME, &BinaryArtifact::new(b"two".to_vec()))
        .await
        .unwrap();

    assert_eq!(first, dir.path().join("summary.docx"));
    assert_eq!(second, dir.path().join("summary (1).docx"));
    assert_eq!(std::fs::read(&first).unwrap(), b"one");
    assert_eq!(std::fs::read(&second).unwrap(), b"two");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn json_error_reply_is_export_failure() {
    let service = MockService::start().await;
    service
        .enqueue(MockResponse::json(r#"{"error":"python-docx failed"}"#))
        .await;
    let client = ExportClient::new(&ApiConfig::new(service.base_url()));

    let err = client.export_summary("text").await.unwrap_err();
    assert!(matches!(err, WorkflowError::ExportFailed(_)));
    let cause = std::error::Error::source(&err).expect("cause attached").to_string();
    assert!(cause.contains("python-docx failed"), "{cause}");
}
