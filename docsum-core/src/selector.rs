//! File selection: turns a drop payload or picker event into the single
//! [`Document`] the workflow operates on.
//!
//! Only the first file of a payload is used; extra files are ignored. The
//! [`ACCEPT_HINT`] mirrors the picker filter and is advisory only, the remote
//! service decides what it can read.

use std::path::Path;
use tracing::{debug, info};

/// Extensions suggested to the file picker.
pub const ACCEPT_HINT: &str = ".txt,.pdf,.docx";

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const FALLBACK_MIME: &str = "application/octet-stream";

/// An uploaded file: raw bytes plus the name and MIME type sent along with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Document {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Builds a document whose MIME type is inferred from `filename`.
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let filename = filename.into();
        let mime_type = mime_for(&filename);
        Document::new(filename, mime_type, bytes)
    }

    /// Reads a file from disk without blocking the runtime.
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        info!(path = %path.display(), size = bytes.len(), "Loaded document from disk");
        Ok(Document::from_bytes(filename, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the extension is one the picker suggests. Never used to reject a file.
    pub fn matches_accept_hint(&self) -> bool {
        match extension(&self.filename) {
            Some(ext) => ACCEPT_HINT
                .split(',')
                .any(|hint| hint.trim_start_matches('.') == ext),
            None => false,
        }
    }
}

/// MIME type for the extensions the service understands.
pub fn mime_for(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("docx") => DOCX_MIME,
        _ => FALLBACK_MIME,
    }
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// Where a selection came from. Both carry every file the user offered.
#[derive(Debug, Clone)]
pub enum FileSource {
    Dropped(Vec<Document>),
    Picked(Vec<Document>),
}

impl FileSource {
    /// The first file of the payload; anything after it is dropped.
    pub fn into_first(self) -> Option<Document> {
        let (origin, files) = match self {
            FileSource::Dropped(files) => ("drop", files),
            FileSource::Picked(files) => ("picker", files),
        };
        if files.len() > 1 {
            debug!(origin, ignored = files.len() - 1, "Ignoring files beyond the first");
        }
        files.into_iter().next()
    }
}
