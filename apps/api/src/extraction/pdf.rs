//! PDF text extraction for uploaded resumes.

use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The PDF could not be read at all (corrupt file, unsupported encoding, ...).
    #[error("{0}")]
    Parse(String),

    /// The PDF parsed but holds no extractable characters.
    #[error("PDF contains no extractable text")]
    EmptyContent,
}

/// Extracts the text of every page, each page followed by a newline, trimmed as a whole.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
        error!("Error extracting PDF: {e}");
        ExtractionError::Parse(e.to_string())
    })?;

    let text = join_pages(&pages);
    info!("Extracted {} characters from PDF", text.len());

    if text.is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(text)
}

/// Runs [`extract_pdf_text`] on the blocking pool.
///
/// The PDF library may panic on hostile input; a panic surfaces as `Parse`.
pub async fn extract_pdf_text_blocking(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| {
            error!("PDF extraction task failed: {e}");
            if e.is_panic() {
                ExtractionError::Parse("PDF parser aborted on malformed input".to_string())
            } else {
                ExtractionError::Parse(e.to_string())
            }
        })?
}

fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text.trim().to_string()
}
