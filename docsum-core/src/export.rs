//! Export: convert the summary into a Word document and deliver it.
//!
//! [`ExportClient`] posts the text to `{base}/download` and returns the raw
//! bytes; a JSON reply is the service reporting a failed conversion and never
//! counts as a document. [`DirectorySink`] turns those bytes into a file the user can open.
//! Each delivery stages the bytes in a temporary file next to the target and
//! then moves it into place; the temporary is removed on every path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::ApiConfig;
use crate::contract::{BinaryArtifact, DownloadSink, Exporter};
use crate::error::{body_excerpt, BoxError, ServiceError, WorkflowError};

/// Name given to every exported summary, whatever the server suggests.
pub const EXPORT_FILENAME: &str = "summary.docx";

/// Upper bound on `name (n).ext` suffixes tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Serialize)]
struct DownloadRequest<'a> {
    summary: &'a str,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: Option<String>,
}

pub struct ExportClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ExportClient {
    pub fn new(config: &ApiConfig) -> Self {
        ExportClient::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Self {
        ExportClient {
            http,
            endpoint: config.endpoint("download"),
        }
    }

    async fn send(&self, summary: &str) -> Result<BinaryArtifact, ServiceError> {
        let transport = |source| ServiceError::Transport {
            url: self.endpoint.clone(),
            source,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&DownloadRequest { summary })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body: body_excerpt(&body),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(transport)?;

        if content_type.as_deref().is_some_and(is_json) {
            return Err(json_reply_error(&self.endpoint, &bytes));
        }

        Ok(BinaryArtifact {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// A `/download` reply that came back as JSON instead of a document.
pub(crate) fn json_reply_error(url: &str, body: &[u8]) -> ServiceError {
    match serde_json::from_slice::<ErrorReply>(body) {
        Ok(ErrorReply {
            error: Some(message),
        }) => ServiceError::Rejected(message),
        _ => ServiceError::Malformed {
            url: url.to_string(),
            reason: format!(
                "expected a Word document, got JSON: {}",
                body_excerpt(&String::from_utf8_lossy(body))
            ),
        },
    }
}

#[async_trait]
impl Exporter for ExportClient {
    async fn export_summary(&self, summary: &str) -> Result<BinaryArtifact, WorkflowError> {
        info!(url = %self.endpoint, summary_chars = summary.len(), "Requesting export");
        match self.send(summary).await {
            Ok(artifact) => {
                info!(
                    bytes = artifact.bytes.len(),
                    content_type = artifact.content_type.as_deref().unwrap_or("unknown"),
                    "Export received"
                );
                Ok(artifact)
            }
            Err(e) => {
                error!(error = %e, "Export request failed");
                Err(WorkflowError::export(e))
            }
        }
    }
}

/// Saves downloads into a directory, never overwriting an earlier one.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, filename: &str, artifact: &BinaryArtifact) -> Result<PathBuf, BoxError> {
        let dir = self.dir.clone();
        let filename = filename.to_string();
        let bytes = artifact.bytes.clone();

        let saved = tokio::task::spawn_blocking(move || stage_and_persist(&dir, &filename, &bytes))
            .await??;
        info!(path = %saved.display(), "Download saved");
        Ok(saved)
    }
}

/// Write `bytes` to a staged temporary in `dir`, then move it to the first
/// free `filename` variant. The staged file is gone when this returns.
fn stage_and_persist(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".docsum-")
        .suffix(".part")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    debug!(staged = %staged.path().display(), size = bytes.len(), "Staged download");

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dir.join(numbered_name(filename, attempt));
        if target.exists() {
            continue;
        }
        match staged.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => staged = e.file,
            Err(e) => return Err(e.error),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {filename} in {}", dir.display()),
    ))
}

/// `summary.docx`, `summary (1).docx`, `summary (2).docx`, ...
fn numbered_name(filename: &str, n: u32) -> String {
    if n == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    match path.extension() {
        Some(ext) => format!("{stem} ({n}).{}", ext.to_string_lossy()),
        None => format!("{stem} ({n})"),
    }
}
