//! Error taxonomy for the summarize/export workflow.
//!
//! Two user-facing failures exist: [`WorkflowError::SummarizationFailed`] and
//! [`WorkflowError::ExportFailed`]. Both carry the underlying cause as a boxed
//! error so transport, status, parse and local I/O failures flow through the
//! same variant. [`ServiceError`] is the cause type produced by the HTTP
//! clients in this crate.

use thiserror::Error;

/// Boxed cause carried by [`WorkflowError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a workflow action, recovered locally by the controller.
///
/// `Display` is the message shown to the user; the cause is available via
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to generate summary. Please try again.")]
    SummarizationFailed(#[source] BoxError),

    #[error("Failed to download summary.")]
    ExportFailed(#[source] BoxError),
}

impl WorkflowError {
    pub fn summarization(cause: impl Into<BoxError>) -> Self {
        WorkflowError::SummarizationFailed(cause.into())
    }

    pub fn export(cause: impl Into<BoxError>) -> Self {
        WorkflowError::ExportFailed(cause.into())
    }

    /// Name of the operation that failed, for log fields and notices.
    pub fn operation(&self) -> &'static str {
        match self {
            WorkflowError::SummarizationFailed(_) => "summarize",
            WorkflowError::ExportFailed(_) => "export",
        }
    }
}

/// Why a call to the remote service did not produce a usable answer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("service reported an error: {0}")]
    Rejected(String),
}

/// Longest slice of an error body kept in [`ServiceError::Status`].
pub(crate) const BODY_EXCERPT_LEN: usize = 200;

pub(crate) fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
