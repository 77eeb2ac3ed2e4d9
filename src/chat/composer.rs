use crate::backends::{CompletionModel, Embedder};
use crate::chat::canned;
use crate::chat::envelope::{ResponseEnvelope, SourceRef};
use crate::chat::intent::Intent;
use crate::chat::prompt::build_answer_prompt;
use crate::chat::suggest::suggest;
use crate::config::SearchConfig;
use crate::error::{AskdeskError, Result};
use crate::index::{keyword_candidates, top_k_similar, PopulatedIndex};
use crate::ingest::Chunk;

/// Outcome of a vector retrieval attempt. A typed fallback signal instead of
/// exception-driven control flow: the caller decides to degrade, the vector
/// path never panics or swallows.
pub enum RetrievalOutcome {
    Answered(ResponseEnvelope),
    FallbackNeeded(AskdeskError),
}

/// Top-K width for a label: wider for broad service/menu queries, narrower
/// for targeted general ones
fn retrieval_k(intent: Intent, config: &SearchConfig) -> usize {
    if intent == Intent::GeneralQuery {
        config.general_k
    } else {
        config.service_k
    }
}

/// Char-safe truncation for previews and fallback context
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

fn source_refs(chunks: &[&Chunk], preview_chars: usize) -> Vec<SourceRef> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| SourceRef {
            document: chunk.source.clone(),
            chunk_id: i,
            content_preview: truncate_chars(&chunk.content, preview_chars),
        })
        .collect()
}

/// Compose a retrieval-augmented answer for `query`.
///
/// Tries the vector path when the index carries embeddings and an embedder is
/// configured; any backend failure along that path degrades transparently to
/// the keyword fallback. This degrade-on-failure step is a correctness
/// requirement: the only error this function can return is a completion
/// failure on the fallback path itself, which the orchestrator absorbs.
pub async fn compose_retrieval(
    index: &PopulatedIndex,
    embedder: Option<&dyn Embedder>,
    llm: &dyn CompletionModel,
    config: &SearchConfig,
    query: &str,
    intent: Intent,
) -> Result<ResponseEnvelope> {
    if index.is_vector() {
        if let Some(embedder) = embedder {
            match vector_answer(index, embedder, llm, config, query, intent).await {
                RetrievalOutcome::Answered(envelope) => return Ok(envelope),
                RetrievalOutcome::FallbackNeeded(e) => {
                    log::warn!("Vector retrieval failed: {}. Falling back to keyword search.", e);
                }
            }
        }
    }

    keyword_answer(index, llm, config, query, intent).await
}

/// Vector path: embed the query, rank stored embeddings by cosine similarity,
/// and ask the model to answer from the top-K chunk contents.
async fn vector_answer(
    index: &PopulatedIndex,
    embedder: &dyn Embedder,
    llm: &dyn CompletionModel,
    config: &SearchConfig,
    query: &str,
    intent: Intent,
) -> RetrievalOutcome {
    let query_vec = match embedder.embed(query).await {
        Ok(v) => v,
        Err(e) => return RetrievalOutcome::FallbackNeeded(e),
    };

    let k = retrieval_k(intent, config);
    let top = top_k_similar(index, &query_vec, k);
    if top.is_empty() {
        return RetrievalOutcome::FallbackNeeded(AskdeskError::Backend(
            "vector index returned no results".to_string(),
        ));
    }

    let chunks: Vec<&Chunk> = top.iter().map(|(_, i)| &index.chunks[*i]).collect();
    let context = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let answer = match llm.generate(&build_answer_prompt(&context, query)).await {
        Ok(a) => a,
        Err(e) => return RetrievalOutcome::FallbackNeeded(e),
    };

    let quick_replies = suggest(&answer, intent);

    RetrievalOutcome::Answered(ResponseEnvelope {
        sources: source_refs(&chunks, config.preview_chars),
        quick_replies,
        answer,
        ..Default::default()
    })
}

/// Keyword fallback: chunks sharing at least one word with the query, top N in
/// original document order, truncated and concatenated as context.
async fn keyword_answer(
    index: &PopulatedIndex,
    llm: &dyn CompletionModel,
    config: &SearchConfig,
    query: &str,
    intent: Intent,
) -> Result<ResponseEnvelope> {
    let candidates = keyword_candidates(&index.chunks, query, config.fallback_top_n);

    if candidates.is_empty() {
        return Ok(canned::no_information_response());
    }

    let context = candidates
        .iter()
        .map(|c| truncate_chars(&c.content, config.fallback_context_chars))
        .collect::<Vec<_>>()
        .join("\n\n");

    let answer = llm.generate(&build_answer_prompt(&context, query)).await?;
    let quick_replies = suggest(&answer, intent);

    Ok(ResponseEnvelope {
        sources: source_refs(&candidates, config.preview_chars),
        quick_replies,
        answer,
        ..Default::default()
    })
}
