pub mod chunker;
pub mod loader;
pub mod walker;

pub use chunker::{chunk_document, chunk_text, Chunk};
pub use loader::load_content;
pub use walker::{discover_files, FileMetadata};

use crate::config::ChunkingConfig;
use crate::error::{AskdeskError, Result};
use std::path::Path;

/// Ingest every eligible document under `dir` into a flat ordered chunk sequence.
///
/// Pipeline per file: load → chunk → attach filename provenance. Chunk ordering
/// within a file is its sequence order; files are processed in sorted filename
/// order, so the combined sequence is reproducible for an unchanged directory.
///
/// Fails with an ingestion error when the directory is missing or contains zero
/// eligible files after extension filtering - an empty index is never produced
/// silently.
pub fn ingest_directory(dir: &Path, config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    let files = discover_files(dir)?;

    if files.is_empty() {
        return Err(AskdeskError::Ingestion(format!(
            "no documents found in {}",
            dir.display()
        )));
    }

    let mut chunks = Vec::new();

    for file in &files {
        log::info!("Processing {}", file.file_name);
        let content = load_content(&file.absolute_path, &file.extension)?;
        let file_chunks = chunk_document(&content, &file.file_name, config);
        log::debug!("{} -> {} chunks", file.file_name, file_chunks.len());
        chunks.extend(file_chunks);
    }

    log::info!(
        "Ingested {} documents into {} chunks",
        files.len(),
        chunks.len()
    );

    Ok(chunks)
}
