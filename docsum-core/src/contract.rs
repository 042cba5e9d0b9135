//! # contract: types and traits shared by the workflow and its collaborators
//!
//! The controller talks to the outside world through three traits:
//! - [`Summarizer`]: turns a [`Document`] into a [`SummaryResult`]
//! - [`Exporter`]: turns summary text into a [`BinaryArtifact`]
//! - [`DownloadSink`]: hands an artifact to the user as a named file
//!
//! Real implementations live in [`crate::summarize`] and [`crate::export`].
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`. The mocks are exported under the
//!   `test-export-mocks` feature so the CLI crate can drive the controller
//!   without a network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::{BoxError, WorkflowError};
use crate::selector::Document;

/// Requested summary size. The service maps each to a target word range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl SummaryLength {
    pub const ALL: [SummaryLength; 3] = [
        SummaryLength::Short,
        SummaryLength::Medium,
        SummaryLength::Detailed,
    ];

    /// Wire name sent in the `length` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Detailed => "detailed",
        }
    }

    /// Target word count the service aims for.
    pub fn word_range(&self) -> RangeInclusive<u32> {
        match self {
            SummaryLength::Short => 30..=80,
            SummaryLength::Medium => 60..=150,
            SummaryLength::Detailed => 100..=250,
        }
    }

    /// Selector label, e.g. `Short (30-80 words)`.
    pub fn label(&self) -> String {
        let range = self.word_range();
        let name = match self {
            SummaryLength::Short => "Short",
            SummaryLength::Medium => "Medium",
            SummaryLength::Detailed => "Detailed",
        };
        format!("{name} ({}-{} words)", range.start(), range.end())
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown summary length `{0}` (expected short, medium or detailed)")]
pub struct ParseLengthError(pub String);

impl FromStr for SummaryLength {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryLength::ALL
            .into_iter()
            .find(|len| len.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLengthError(s.to_string()))
    }
}

/// Word counts reported by the service.
///
/// `reduction_percentage` is taken as reported: it is not recomputed from the
/// word counts and not clamped to `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub original_words: u64,
    pub summary_words: u64,
    #[serde(default)]
    pub reduction_percentage: Option<f64>,
}

/// A finished summary. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub text: String,
    pub stats: Option<SummaryStats>,
}

/// Raw bytes returned by the conversion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl BinaryArtifact {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        BinaryArtifact {
            bytes: bytes.into(),
            content_type: None,
        }
    }
}

/// Client for the summarization service.
///
/// One call is one network request: no retry, no cancellation.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Upload `document` and ask for a summary of the given length.
    async fn request_summary(
        &self,
        document: &Document,
        length: SummaryLength,
    ) -> Result<SummaryResult, WorkflowError>;
}

/// Client for the conversion endpoint.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Convert summary text into a downloadable document.
    async fn export_summary(&self, summary: &str) -> Result<BinaryArtifact, WorkflowError>;
}

/// Destination for finished downloads.
///
/// Implementors must release any temporary they create on every path,
/// successful or not.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Deliver `artifact` under `filename`, returning where it ended up.
    async fn deliver(
        &self,
        filename: &str,
        artifact: &BinaryArtifact,
    ) -> Result<PathBuf, BoxError>;
}
