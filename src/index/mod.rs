use crate::ingest::Chunk;
use std::sync::Arc;

/// A complete, consistent chunk set from the last successful ingestion.
///
/// `embeddings`, when present, is parallel to `chunks` (one vector per chunk)
/// and enables similarity retrieval; without it the index is degraded to the
/// keyword fallback. The keyword path always works off `chunks`, so a vector
/// index can degrade per-query without touching the store.
#[derive(Debug, Clone)]
pub struct PopulatedIndex {
    /// All chunks in original document order
    pub chunks: Arc<Vec<Chunk>>,
    /// One embedding per chunk when the vector backend was available at build time
    pub embeddings: Option<Arc<Vec<Vec<f32>>>>,
}

impl PopulatedIndex {
    pub fn is_vector(&self) -> bool {
        self.embeddings.is_some()
    }
}

/// Process-wide index lifecycle: uninitialized → populated (vector) →
/// populated (degraded to keyword). Owned by the engine behind a RwLock;
/// transitions happen only under the write lock.
#[derive(Debug, Clone, Default)]
pub enum IndexState {
    #[default]
    Uninitialized,
    Populated(PopulatedIndex),
}

impl IndexState {
    pub fn as_populated(&self) -> Option<&PopulatedIndex> {
        match self {
            IndexState::Uninitialized => None,
            IndexState::Populated(index) => Some(index),
        }
    }
}

/// Compute cosine similarity between two vectors
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Rank the index's chunks against a query vector and return the top-k
/// `(score, chunk index)` pairs, best first.
///
/// Returns an empty vector when the index holds no embeddings.
pub fn top_k_similar(index: &PopulatedIndex, query_vec: &[f32], k: usize) -> Vec<(f32, usize)> {
    let Some(embeddings) = index.embeddings.as_ref() else {
        return Vec::new();
    };

    let mut scored: Vec<(f32, usize)> = embeddings
        .iter()
        .enumerate()
        .map(|(i, embedding)| (cosine_similarity(query_vec, embedding), i))
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Select fallback candidates: chunks whose content shares at least one word
/// with the query (case-insensitive substring match, as in a basic text
/// search), taking the first `top_n` in original document order.
pub fn keyword_candidates<'a>(chunks: &'a [Chunk], query: &str, top_n: usize) -> Vec<&'a Chunk> {
    let words: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect();

    if words.is_empty() {
        return Vec::new();
    }

    chunks
        .iter()
        .filter(|chunk| {
            let content = chunk.content.to_lowercase();
            words.iter().any(|word| content.contains(word.as_str()))
        })
        .take(top_n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, source: &str, sequence_no: usize) -> Chunk {
        Chunk {
            content: content.to_string(),
            source: source.to_string(),
            sequence_no,
        }
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_magnitude() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_top_k_similar_ranks_by_score() {
        let index = PopulatedIndex {
            chunks: Arc::new(vec![
                chunk("far", "a.txt", 0),
                chunk("near", "a.txt", 1),
                chunk("middle", "a.txt", 2),
            ]),
            embeddings: Some(Arc::new(vec![
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![0.7, 0.7],
            ])),
        };

        let top = top_k_similar(&index, &[1.0, 0.0], 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].1, 1);
        assert_eq!(top[1].1, 2);
        assert!(top[0].0 > top[1].0);
    }

    #[test]
    fn test_top_k_similar_without_embeddings() {
        let index = PopulatedIndex {
            chunks: Arc::new(vec![chunk("text", "a.txt", 0)]),
            embeddings: None,
        };
        assert!(top_k_similar(&index, &[1.0], 3).is_empty());
    }

    #[test]
    fn test_keyword_candidates_shared_word() {
        let chunks = vec![
            chunk("We offer AI development services", "services.txt", 0),
            chunk("Our office is in the city center", "contact.txt", 0),
            chunk("Consulting services for automation", "services.txt", 1),
        ];

        let result = keyword_candidates(&chunks, "what SERVICES do you offer", 3);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].sequence_no, 0);
        assert_eq!(result[1].sequence_no, 1);
    }

    #[test]
    fn test_keyword_candidates_original_order_and_cap() {
        let chunks: Vec<Chunk> = (0..5)
            .map(|i| chunk("services everywhere", "doc.txt", i))
            .collect();

        let result = keyword_candidates(&chunks, "services", 3);
        assert_eq!(result.len(), 3);
        assert_eq!(
            result.iter().map(|c| c.sequence_no).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_keyword_candidates_no_match() {
        let chunks = vec![chunk("We offer AI services", "services.txt", 0)];
        assert!(keyword_candidates(&chunks, "zzqqxx", 3).is_empty());
    }

    #[test]
    fn test_index_state_default_uninitialized() {
        let state = IndexState::default();
        assert!(state.as_populated().is_none());
    }
}
