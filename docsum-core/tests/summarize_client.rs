mod common;

use common::mock_service::{MockResponse, MockService};
use docsum_core::config::ApiConfig;
use docsum_core::contract::{SummaryLength, Summarizer};
use docsum_core::error::WorkflowError;
use docsum_core::selector::Document;
use docsum_core::summarize::SummaryClient;
use std::error::Error as _;

const FULL_BODY: &str = r#"{"summary":"A brief text.","stats":{"original_words":500,"summary_words":40,"reduction_percentage":92}}"#;

fn report() -> Document {
    Document::from_bytes("report.pdf", b"%PDF-1.4 quarterly numbers".to_vec())
}

#[tokio::test]
async fn sends_file_and_length_as_multipart() {
    let service = MockService::start().await;
    service.enqueue(MockResponse::json(FULL_BODY)).await;
    let client = SummaryClient::new(&ApiConfig::new(service.base_url()));

    client
        .request_summary(&report(), SummaryLength::Short)
        .await
        .expect("summary should succeed");

    let requests = service.requests().await;
    assert_eq!(requests.len(), 1, "exactly one network call");
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/summarize");
    assert!(req.content_type.starts_with("multipart/form-data"));

    let body = req.body_text();
    assert!(body.contains(r#"name="file"; filename="report.pdf""#));
    assert!(body.contains("Content-Type: application/pdf"));
    assert!(body.contains("%PDF-1.4 quarterly numbers"));
    assert!(body.contains(r#"name="length""#));
    assert!(body.contains("\r\n\r\nshort\r\n"));
}

#[tokio::test]
async fn summary_text_is_returned_verbatim() {
    let service = MockService::start().await;
    let text = "  Line one.\n\nLine two — with “quotes”.  ";
    let body = serde_json::json!({ "summary": text }).to_string();
    service.enqueue(MockResponse::json(&body)).await;
    let client = SummaryClient::new(&ApiConfig::new(service.base_url()));

    let result = client
        .request_summary(&report(), SummaryLength::Medium)
        .await
        .unwrap();
    assert_eq!(result.text, text);
    assert!(result.stats.is_none());
}

#[tokio::test]
async fn error_status_is_summarization_failure() {
    let service = MockService::start().await;
    service
        .enqueue(MockResponse::status(500, "model crashed"))
        .await;
    let client = SummaryClient::new(&ApiConfig::new(service.base_url()));

    let err = client
        .request_summary(&report(), SummaryLength::Medium)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::SummarizationFailed(_)));
    let cause = err.source().unwrap().to_string();
    assert!(cause.contains("500"), "cause should name the status: {cause}");
    assert!(cause.contains("model crashed"));
    assert_eq!(service.requests().await.len(), 1, "no retry");
}

#[tokio::test]
async fn error_field_is_summarization_failure() {
    let service = MockService::start().await;
    service
        .enqueue(MockResponse::json(r#"{"error":"Unsupported file type"}"#))
        .await;
    let client = SummaryClient::new(&ApiConfig::new(service.base_url()));

    let err = client
        .request_summary(&Document::from_bytes("image.png", vec![1, 2, 3]), SummaryLength::Medium)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::SummarizationFailed(_)));
    assert!(err.source().unwrap().to_string().contains("Unsupported file type"));
}

#[tokio::test]
async fn unreachable_service_is_summarization_failure() {
    // Bind then drop a listener so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = SummaryClient::new(&ApiConfig::new(format!("http://{addr}")));

    let err = client
        .request_summary(&report(), SummaryLength::Medium)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::SummarizationFailed(_)));
}
