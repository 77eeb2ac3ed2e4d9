use crate::error::{AskdeskError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Metadata for a discovered source document
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Filename used as the provenance label on chunks
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub extension: String,
}

/// Discover eligible documents in the configured document directory.
///
/// Walks the directory and keeps files with a supported extension
/// (case-insensitive): `.pdf`, `.txt`. Everything else is silently skipped.
/// Results are sorted by filename so repeated ingestions of an unchanged
/// directory produce identical chunk ordering.
pub fn discover_files(root: &Path) -> Result<Vec<FileMetadata>> {
    if !root.is_dir() {
        return Err(AskdeskError::Ingestion(format!(
            "document directory does not exist: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        if !matches!(extension.as_str(), "pdf" | "txt") {
            log::debug!("Skipping unsupported file: {}", path.display());
            continue;
        }

        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        files.push(FileMetadata {
            file_name,
            absolute_path: path.to_path_buf(),
            extension,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    log::info!("Discovered {} documents in {}", files.len(), root.display());
    Ok(files)
}
