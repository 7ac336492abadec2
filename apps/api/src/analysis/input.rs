//! Input resolution for `/analyze`.
//!
//! A logical field (resume or job description) can arrive as an uploaded document or as
//! inline text. An upload with an allowed extension always wins. Resolution never fails:
//! unreadable documents and malformed bodies are logged and resolve to empty text, which
//! the caller then rejects as missing input.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use serde::Deserialize;
use tracing::warn;

use crate::analysis::extract::{extract_text, DocumentKind};

/// Part names for one logical field: the inline text part and the file part.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub text: &'static str,
    pub file: &'static str,
}

pub const RESUME: FieldSpec = FieldSpec {
    text: "resume",
    file: "resume_file",
};

pub const JOB_DESCRIPTION: FieldSpec = FieldSpec {
    text: "job_desc",
    file: "job_desc_file",
};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Everything a request submitted, keyed by part name.
#[derive(Debug, Default)]
pub struct FormInput {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

/// `application/x-www-form-urlencoded` body. Uses the same names as the multipart form.
#[derive(Debug, Default, Deserialize)]
pub struct UrlEncodedBody {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_desc: String,
}

impl FormInput {
    /// Inline text only, as sent by JSON and urlencoded clients.
    pub fn inline(resume: String, job_description: String) -> Self {
        let mut form = FormInput::default();
        form.insert_text(RESUME.text, resume);
        form.insert_text(JOB_DESCRIPTION.text, job_description);
        form
    }

    pub fn insert_text(&mut self, name: &str, text: String) {
        self.texts.insert(name.to_string(), text);
    }

    pub fn insert_file(&mut self, name: &str, filename: String, bytes: Bytes) {
        self.files
            .insert(name.to_string(), UploadedFile { filename, bytes });
    }

    /// Drains a multipart stream. A read error stops collection and keeps what was read so far.
    pub async fn from_multipart(mut multipart: Multipart) -> Self {
        let mut form = FormInput::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read multipart field: {e}");
                    break;
                }
            };

            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            // Browsers send an empty filename for an untouched file input
            if let Some(filename) = field.file_name().map(str::to_string) {
                if filename.is_empty() {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => form.insert_file(&name, filename, bytes),
                    Err(e) => warn!(field = %name, "Failed to read uploaded file: {e}"),
                }
                continue;
            }

            match field.text().await {
                Ok(text) => form.insert_text(&name, text),
                Err(e) => warn!(field = %name, "Failed to read form field: {e}"),
            }
        }

        form
    }
}

/// Returns the text for `spec`, preferring an allowed upload over inline text.
///
/// An allowed upload that cannot be decoded resolves to `""`; the inline text is not
/// consulted in that case.
pub async fn resolve_field(form: &FormInput, spec: FieldSpec) -> String {
    if let Some(upload) = form.files.get(spec.file) {
        if let Some(kind) = DocumentKind::from_filename(&upload.filename) {
            return match extract_text(kind, upload.bytes.clone()).await {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    warn!(
                        field = spec.file,
                        filename = %upload.filename,
                        "Document extraction failed: {e}"
                    );
                    String::new()
                }
            };
        }
    }

    form.texts
        .get(spec.text)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract::sample_pdf;

    #[tokio::test]
    async fn test_inline_text_is_trimmed() {
        let form = FormInput::inline("  Jane Doe \n".to_string(), "\tRust role ".to_string());
        assert_eq!(resolve_field(&form, RESUME).await, "Jane Doe");
        assert_eq!(resolve_field(&form, JOB_DESCRIPTION).await, "Rust role");
    }

    #[tokio::test]
    async fn test_missing_field_resolves_empty() {
        let form = FormInput::default();
        assert_eq!(resolve_field(&form, RESUME).await, "");
    }

    #[tokio::test]
    async fn test_valid_upload_overrides_inline_text() {
        let mut form = FormInput::inline("pasted resume".to_string(), "pasted jd".to_string());
        form.insert_file(
            RESUME.file,
            "resume.pdf".to_string(),
            Bytes::from(sample_pdf("Uploaded resume text")),
        );

        let resume = resolve_field(&form, RESUME).await;
        assert!(resume.contains("Uploaded resume text"), "got {resume:?}");
        assert!(!resume.contains("pasted resume"));
        assert_eq!(resolve_field(&form, JOB_DESCRIPTION).await, "pasted jd");
    }

    #[tokio::test]
    async fn test_disallowed_extension_falls_back_to_inline() {
        let mut form = FormInput::inline("pasted resume".to_string(), String::new());
        form.insert_file(
            RESUME.file,
            "resume.txt".to_string(),
            Bytes::from_static(b"plain text upload"),
        );
        assert_eq!(resolve_field(&form, RESUME).await, "pasted resume");
    }

    #[tokio::test]
    async fn test_corrupt_upload_resolves_empty() {
        let mut form = FormInput::inline("pasted resume".to_string(), String::new());
        form.insert_file(
            RESUME.file,
            "resume.docx".to_string(),
            Bytes::from_static(b"definitely not a zip archive"),
        );
        assert_eq!(resolve_field(&form, RESUME).await, "");
    }
}
