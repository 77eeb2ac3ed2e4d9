use crate::backends::Embedder;
use crate::error::{AskdeskError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Request structure for the HuggingFace feature-extraction pipeline
#[derive(Serialize)]
struct FeatureExtractionRequest {
    inputs: Vec<String>,
}

/// HuggingFace Inference API embedding client
///
/// Uses the hosted feature-extraction pipeline for sentence-transformer models,
/// so no model weights are loaded locally. One request embeds a batch of texts
/// and returns one vector per input, in order.
pub struct HuggingFaceEmbedder {
    client: Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl HuggingFaceEmbedder {
    /// Create a new embedder
    ///
    /// # Arguments
    ///
    /// * `api_key` - HuggingFace API token
    /// * `model` - Model id (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    /// * `dimensions` - Expected embedding width, validated on every response
    pub fn new(api_key: String, model: String, dimensions: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AskdeskError::Backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            dimensions,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "https://router.huggingface.co/hf-inference/models/{}/pipeline/feature-extraction",
            self.model
        )
    }

    async fn request_embeddings(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let request = FeatureExtractionRequest { inputs: texts };

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AskdeskError::Backend(format!("embedding network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(AskdeskError::Backend(format!(
                "HuggingFace API error {}: {}",
                status, body
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| AskdeskError::Backend(format!("failed to parse embedding response: {}", e)))?;

        for vector in &vectors {
            if vector.len() != self.dimensions {
                return Err(AskdeskError::Backend(format!(
                    "unexpected embedding dimension: expected {}, got {}",
                    self.dimensions,
                    vector.len()
                )));
            }
        }

        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request_embeddings(vec![text.to_string()]).await?;
        if vectors.is_empty() {
            return Err(AskdeskError::Backend(
                "empty response from HuggingFace API".to_string(),
            ));
        }
        Ok(vectors.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let start = std::time::Instant::now();
        let vectors = self.request_embeddings(texts.to_vec()).await?;
        log::debug!(
            "Embedded {} texts in {:?}",
            vectors.len(),
            start.elapsed()
        );
        if vectors.len() != texts.len() {
            return Err(AskdeskError::Backend(format!(
                "embedding count mismatch: sent {}, received {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}
