use crate::config::ChunkingConfig;

/// A bounded-size slice of a source document with provenance metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    /// Originating filename
    pub source: String,
    /// Position within the source document, starting at 0
    pub sequence_no: usize,
}

/// Split text into fixed-size chunks with overlap between consecutive chunks
///
/// Sizes are counted in characters. Splitting is a pure sliding window and is
/// deterministic for identical input: chunk i starts at character offset
/// `i * (size - overlap)`. Slicing is UTF-8 safe because offsets are computed
/// over `char_indices`, never raw bytes.
pub fn chunk_text(text: &str, size_chars: usize, overlap_chars: usize) -> Vec<String> {
    if text.is_empty() || size_chars == 0 {
        return Vec::new();
    }

    // Byte offset of every character, plus the end sentinel
    let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    offsets.push(text.len());
    let n_chars = offsets.len() - 1;

    // Guard against a degenerate overlap that would never advance
    let step = size_chars.saturating_sub(overlap_chars).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < n_chars {
        let end = (start + size_chars).min(n_chars);
        chunks.push(text[offsets[start]..offsets[end]].to_string());
        if end == n_chars {
            break;
        }
        start += step;
    }

    chunks
}

/// Chunk one source document, attaching filename provenance and per-source ordering
pub fn chunk_document(content: &str, source: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    chunk_text(content, config.chunk_size_chars, config.chunk_overlap_chars)
        .into_iter()
        .enumerate()
        .map(|(sequence_no, content)| Chunk {
            content,
            source: source.to_string(),
            sequence_no,
        })
        .collect()
}
