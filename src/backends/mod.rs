pub mod groq;
pub mod huggingface;

pub use groq::GroqClient;
pub use huggingface::HuggingFaceEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Embedding backend: converts text to a vector representation.
///
/// Calls are blocking request/response with no internal retry; a single failure
/// is reported as `AskdeskError::Backend` and triggers the caller's
/// degrade-to-fallback path.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Language-model backend: composes text from a prompt.
///
/// Same failure contract as `Embedder`: one failure, no retry, typed error.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
