//! Best-effort text extraction from uploaded documents
//!
//! PDF and DOCX uploads are converted to plain text before they reach the
//! retrieval store, which indexes text far better than binary containers.

use crate::error::{Error, Result};

/// Document kinds the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
    Other,
}

impl DocumentKind {
    /// Classify by file extension, case-insensitively
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "txt" | "md" => Self::Text,
            _ => Self::Other,
        }
    }

    /// Binary containers worth converting to text before indexing
    pub fn is_convertible(self) -> bool {
        matches!(self, Self::Pdf | Self::Docx)
    }
}

/// Extract text from `bytes` on the blocking pool.
///
/// Returns the trimmed text. Unsupported kinds are an error.
pub async fn extract_text(bytes: Vec<u8>, kind: DocumentKind) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || extract_blocking(&bytes, kind))
        .await
        .map_err(|e| Error::Internal(format!("extraction task failed: {}", e)))??;
    Ok(text.trim().to_string())
}

fn extract_blocking(bytes: &[u8], kind: DocumentKind) -> Result<String> {
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| Error::Validation(format!("unreadable PDF: {}", e))),
        DocumentKind::Docx => docx_text(bytes),
        DocumentKind::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Other => Err(Error::Validation(
            "unsupported document type for text extraction".to_string(),
        )),
    }
}

fn docx_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| Error::Validation(format!("unreadable DOCX: {}", e)))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// A file ready for the retrieval store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Convert PDF and DOCX uploads to `{stem}.txt`.
///
/// Anything else, or a document whose extraction fails or yields no text,
/// is passed through unchanged.
pub async fn prepare_upload(filename: &str, bytes: Vec<u8>) -> PreparedUpload {
    let kind = DocumentKind::from_filename(filename);
    if !kind.is_convertible() {
        return PreparedUpload {
            filename: filename.to_string(),
            bytes,
        };
    }

    match extract_text(bytes.clone(), kind).await {
        Ok(text) if !text.is_empty() => PreparedUpload {
            filename: format!("{}.txt", file_stem(filename)),
            bytes: text.into_bytes(),
        },
        Ok(_) => {
            tracing::debug!(filename, "Extracted no text, uploading original");
            PreparedUpload {
                filename: filename.to_string(),
                bytes,
            }
        }
        Err(e) => {
            tracing::warn!(filename, error = %e, "Text extraction failed, uploading original");
            PreparedUpload {
                filename: filename.to_string(),
                bytes,
            }
        }
    }
}

fn file_stem(filename: &str) -> &str {
    let name = basename(filename);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Final path component, accepting either separator
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
