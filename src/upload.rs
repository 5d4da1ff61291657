//! Multipart file field extraction shared by upload endpoints

use crate::error::{Error, Result};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

/// Form field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// A file received over multipart
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Read the `file` field, skipping any other fields
pub async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("invalid multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::Validation("file field has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("failed to read upload", e))?;
        return Ok(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        });
    }
    Err(Error::Validation(format!(
        "multipart body has no '{}' field",
        FILE_FIELD
    )))
}

/// Body-limit rejections surface as 413, everything else as 400
fn multipart_error(context: &str, e: MultipartError) -> Error {
    let message = format!("{}: {}", context, e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(message)
    } else {
        Error::Validation(message)
    }
}
