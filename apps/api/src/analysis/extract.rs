//! Plain-text extraction for uploaded resumes and job descriptions.
//!
//! Only two formats are accepted: PDF (via `pdf-extract`) and DOCX (via `docx-rust`).
//! Both decoders are synchronous and may panic on hostile input, so decoding runs on
//! the blocking pool and a panic surfaces as `ExtractError::Join`.

use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use docx_rust::document::{BodyContent, Paragraph, ParagraphContent, RunContent};
use docx_rust::document::{TableCellContent, TableRowContent};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("Failed to parse DOCX: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Join(String),
}

/// Upload formats the resolver will decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Matches the file extension against the allow-list, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// Decodes `bytes` as `kind` and returns the document's plain text.
pub async fn extract_text(kind: DocumentKind, bytes: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => extract_pdf(&bytes),
        DocumentKind::Docx => extract_docx(&bytes),
    })
    .await
    .map_err(|e| ExtractError::Join(e.to_string()))?
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    // docx-rust opens archives by path, so the upload goes through a temp file
    let mut temp_file = tempfile::NamedTempFile::new()?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;

    let docx_file = docx_rust::DocxFile::from_file(temp_file.path())
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let docx = docx_file
        .parse()
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    Ok(docx_text(&docx))
}

/// One line per paragraph, in document order. Table cells contribute their paragraphs.
fn docx_text(docx: &docx_rust::Docx) -> String {
    let mut lines = Vec::new();

    for body_content in &docx.document.body.content {
        match body_content {
            BodyContent::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
            BodyContent::Table(table) => {
                for row in &table.rows {
                    for cell_content in &row.cells {
                        if let TableRowContent::TableCell(cell) = cell_content {
                            for content in &cell.content {
                                match content {
                                    TableCellContent::Paragraph(paragraph) => {
                                        lines.push(paragraph_text(paragraph));
                                    }
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    lines.join("\n")
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();

    for content in &paragraph.content {
        let ParagraphContent::Run(run) = content else {
            continue;
        };
        for run_content in &run.content {
            match run_content {
                RunContent::Text(text_elem) => text.push_str(&text_elem.text),
                RunContent::Tab(_) => text.push('\t'),
                RunContent::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }

    text
}

/// Builds a one-page PDF that shows `text` in Helvetica.
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.extend_from_slice(xref.as_bytes());
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    pdf
}

/// Builds a DOCX whose text is `title` followed by a tabbed run with a line break
/// and a one-row, two-cell table.
#[cfg(test)]
pub(crate) fn sample_docx(title: &str) -> Vec<u8> {
    use docx_rust::document::{Break, Run, Tab, Table, TableCell, TableRow};

    let mut docx = docx_rust::Docx::default();
    docx.document.push(Paragraph::default().push_text(title));
    docx.document.push(
        Paragraph::default().push(
            Run::default()
                .push_text("Rust")
                .push(Tab::default())
                .push_text("Tokio")
                .push(Break::default())
                .push_text("Axum"),
        ),
    );
    docx.document.push(
        Table::default().push_row(
            TableRow::default()
                .push_cell(TableCell::paragraph(Paragraph::default().push_text("Skill")))
                .push_cell(TableCell::paragraph(Paragraph::default().push_text("Years"))),
        ),
    );

    docx.write(std::io::Cursor::new(Vec::new()))
        .unwrap()
        .into_inner()
}
