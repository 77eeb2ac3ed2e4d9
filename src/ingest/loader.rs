use crate::error::{AskdeskError, Result};
use std::path::Path;

/// Load the text content of one source document.
///
/// Paginated documents (`.pdf`) go through pdf-extract; plain text is read
/// directly. The walker guarantees only supported extensions reach this point.
pub fn load_content(path: &Path, extension: &str) -> Result<String> {
    match extension {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| {
            AskdeskError::Ingestion(format!(
                "failed to extract text from {}: {}",
                path.display(),
                e
            ))
        }),
        _ => std::fs::read_to_string(path).map_err(|e| {
            AskdeskError::Ingestion(format!("failed to read {}: {}", path.display(), e))
        }),
    }
}
