//! HTTP client for `POST {base}/summarize`.
//!
//! The document goes up as a multipart form (`file` + `length`); the answer
//! is JSON with a `summary` string and optional `stats`. The service signals
//! its own failures with a 200 response carrying an `error` field, which is
//! treated the same as a failed status.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::contract::{SummaryLength, SummaryResult, SummaryStats, Summarizer};
use crate::error::{body_excerpt, ServiceError, WorkflowError};
use crate::selector::Document;

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    stats: Option<SummaryStats>,
    #[serde(default)]
    error: Option<String>,
}

pub struct SummaryClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SummaryClient {
    pub fn new(config: &ApiConfig) -> Self {
        SummaryClient::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing connection pool.
    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Self {
        SummaryClient {
            http,
            endpoint: config.endpoint("summarize"),
        }
    }

    async fn send(
        &self,
        document: &Document,
        length: SummaryLength,
    ) -> Result<SummaryResult, ServiceError> {
        let form = Form::new()
            .part("file", file_part(document))
            .text("length", length.as_str());

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                url: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ServiceError::Transport {
                url: self.endpoint.clone(),
                source,
            })?;
        parse_summary_body(&self.endpoint, &body)
    }
}

#[async_trait]
impl Summarizer for SummaryClient {
    async fn request_summary(
        &self,
        document: &Document,
        length: SummaryLength,
    ) -> Result<SummaryResult, WorkflowError> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            filename = %document.filename,
            size = document.size(),
            %length,
            url = %self.endpoint,
            "Requesting summary"
        );

        match self.send(document, length).await {
            Ok(result) => {
                info!(
                    %request_id,
                    summary_chars = result.text.len(),
                    has_stats = result.stats.is_some(),
                    "Summary received"
                );
                Ok(result)
            }
            Err(e) => {
                error!(%request_id, error = %e, "Summary request failed");
                Err(WorkflowError::summarization(e))
            }
        }
    }
}

fn file_part(document: &Document) -> Part {
    let part = || Part::bytes(document.bytes.clone()).file_name(document.filename.clone());
    part().mime_str(&document.mime_type).unwrap_or_else(|e| {
        warn!(mime = %document.mime_type, error = %e, "Invalid MIME type, sending without one");
        part()
    })
}

/// Decode a `/summarize` body. Text and stats pass through untouched.
pub(crate) fn parse_summary_body(url: &str, body: &[u8]) -> Result<SummaryResult, ServiceError> {
    let parsed: SummarizeResponse =
        serde_json::from_slice(body).map_err(|e| ServiceError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(message) = parsed.error {
        return Err(ServiceError::Rejected(message));
    }

    let text = parsed.summary.ok_or_else(|| ServiceError::Malformed {
        url: url.to_string(),
        reason: "missing `summary` field".to_string(),
    })?;

    Ok(SummaryResult {
        text,
        stats: parsed.stats,
    })
}
