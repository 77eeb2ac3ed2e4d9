use crate::backends::{CompletionModel, Embedder, GroqClient, HuggingFaceEmbedder};
use crate::chat::canned;
use crate::chat::composer::compose_retrieval;
use crate::chat::envelope::ResponseEnvelope;
use crate::chat::intent::{Intent, IntentClassifier};
use crate::config::Config;
use crate::db::Db;
use crate::error::{AskdeskError, Result};
use crate::index::{IndexState, PopulatedIndex};
use crate::ingest::ingest_directory;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Query orchestrator and owner of the process-wide index state.
///
/// Constructed once at process start and shared by reference; the index lives
/// behind a RwLock so concurrent queries read simultaneously while a rebuild
/// holds exclusive access only for the final swap.
pub struct ChatEngine {
    config: Config,
    db: Db,
    classifier: IntentClassifier,
    embedder: Option<Arc<dyn Embedder>>,
    llm: Arc<dyn CompletionModel>,
    index: RwLock<IndexState>,
}

impl ChatEngine {
    /// Assemble an engine from explicit collaborators (used directly by tests)
    pub fn new(
        config: Config,
        db: Db,
        embedder: Option<Arc<dyn Embedder>>,
        llm: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            config,
            db,
            classifier: IntentClassifier::new(),
            embedder,
            llm,
            index: RwLock::new(IndexState::Uninitialized),
        }
    }

    /// Assemble an engine with the production backends.
    ///
    /// The LLM credential is required (config validation already enforced it);
    /// a missing embedding credential only disables vector retrieval.
    pub fn from_config(config: Config, db: Db) -> Result<Self> {
        let llm_key = std::env::var(&config.llm.api_key_env).map_err(|_| {
            AskdeskError::Config(format!(
                "environment variable {} not set",
                config.llm.api_key_env
            ))
        })?;

        let llm: Arc<dyn CompletionModel> = Arc::new(GroqClient::new(
            llm_key,
            config.llm.model.clone(),
            config.llm.temperature,
            config.llm.max_tokens,
        )?);

        let embedder: Option<Arc<dyn Embedder>> =
            match std::env::var(&config.embeddings.api_key_env) {
                Ok(key) => Some(Arc::new(HuggingFaceEmbedder::new(
                    key,
                    config.embeddings.model.clone(),
                    config.embeddings.dimensions,
                )?)),
                Err(_) => {
                    log::warn!(
                        "{} not set - running without vector retrieval",
                        config.embeddings.api_key_env
                    );
                    None
                }
            };

        Ok(Self::new(config, db, embedder, llm))
    }

    /// Answer one query. Never fails: every internal error is absorbed into a
    /// valid (if degraded) envelope at this boundary.
    pub async fn query(&self, text: &str) -> ResponseEnvelope {
        let intent = self.classifier.classify(text);
        log::debug!("Classified query as {:?}", intent);

        match self.compose(intent, text).await {
            Ok(envelope) => envelope,
            Err(e) => {
                log::error!("Query processing failed: {}", e);
                canned::degraded_response()
            }
        }
    }

    /// Dispatch to the canned or retrieval path for a classified query
    async fn compose(&self, intent: Intent, text: &str) -> Result<ResponseEnvelope> {
        match intent {
            Intent::Greeting => Ok(canned::greeting_response()),
            Intent::Simple => Ok(canned::simple_response(text)),
            Intent::ContactRequest => Ok(canned::contact_request_response()),
            Intent::MeetingRequest => Ok(canned::meeting_request_response()),
            _ if intent.is_menu() => {
                // Each menu label carries one fixed retrieval query
                let query = canned::menu_query(intent).ok_or_else(|| {
                    AskdeskError::Backend(format!("no menu query for {:?}", intent))
                })?;
                let mut envelope = self.retrieval_response(query, intent).await?;
                if intent == Intent::ContactUs {
                    // Always offer the form, whatever retrieval produced
                    envelope.contact_form = true;
                }
                Ok(envelope)
            }
            _ => self.retrieval_response(text, intent).await,
        }
    }

    /// Run the retrieval-augmented path, short-circuiting when uninitialized
    async fn retrieval_response(&self, query: &str, intent: Intent) -> Result<ResponseEnvelope> {
        let state = self.index.read().await;

        let Some(index) = state.as_populated() else {
            return Ok(canned::not_initialized_response());
        };

        compose_retrieval(
            index,
            self.embedder.as_deref(),
            self.llm.as_ref(),
            &self.config.search,
            query,
            intent,
        )
        .await
    }

    /// Full ingest-and-index rebuild from the current document directory.
    ///
    /// Ingestion and embedding happen before any lock is taken, so queries keep
    /// observing the prior complete index for the whole rebuild; the store swap
    /// is one transaction and the in-memory swap holds the write lock. An
    /// embedding failure degrades the new index to keyword mode; an ingestion
    /// failure propagates and leaves the previous index untouched.
    pub async fn initialize_documents(&self) -> Result<()> {
        let chunks = ingest_directory(self.config.documents_dir(), &self.config.chunking)?;

        let embeddings = match &self.embedder {
            Some(embedder) => {
                let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
                match embedder.embed_batch(&texts).await {
                    Ok(vectors) => Some(vectors),
                    Err(e) => {
                        log::warn!(
                            "Embedding backend unavailable ({}). Building keyword-only index.",
                            e
                        );
                        None
                    }
                }
            }
            None => None,
        };

        self.db
            .replace_chunks(chunks.clone(), embeddings.clone())
            .await?;

        let populated = PopulatedIndex {
            chunks: Arc::new(chunks),
            embeddings: embeddings.map(Arc::new),
        };

        log::info!(
            "Index rebuilt: {} chunks ({} mode)",
            populated.chunks.len(),
            if populated.is_vector() { "vector" } else { "keyword" }
        );

        let mut state = self.index.write().await;
        *state = IndexState::Populated(populated);

        Ok(())
    }

    /// Restore the index from the persisted store at startup, or attempt one
    /// initial ingest when the store is empty. A failed initial ingest is
    /// logged, not fatal - queries then answer with the initialize prompt.
    pub async fn restore_or_initialize(&self) {
        match self.restore_from_store().await {
            Ok(true) => {}
            Ok(false) => {
                log::info!("Chunk store empty - ingesting documents");
                if let Err(e) = self.initialize_documents().await {
                    log::warn!("Initial ingestion failed: {} - waiting for explicit initialization", e);
                }
            }
            Err(e) => {
                log::warn!("Could not restore index from store: {}", e);
            }
        }
    }

    /// Load a previously persisted index. Returns Ok(false) when the store
    /// holds no chunks.
    async fn restore_from_store(&self) -> Result<bool> {
        let (total, embedded) = self.db.chunk_counts().await?;

        if total == 0 {
            return Ok(false);
        }

        let populated = if embedded == total {
            let rows = self.db.load_embedded_chunks().await?;
            let (chunks, embeddings): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
            PopulatedIndex {
                chunks: Arc::new(chunks),
                embeddings: Some(Arc::new(embeddings)),
            }
        } else {
            PopulatedIndex {
                chunks: Arc::new(self.db.load_chunks().await?),
                embeddings: None,
            }
        };

        log::info!(
            "Restored index with {} chunks ({} mode)",
            populated.chunks.len(),
            if populated.is_vector() { "vector" } else { "keyword" }
        );

        let mut state = self.index.write().await;
        *state = IndexState::Populated(populated);

        Ok(true)
    }

    /// Current (total, embedded) chunk counts from the persisted store
    pub async fn index_stats(&self) -> Result<(usize, usize)> {
        self.db.chunk_counts().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AskdeskConfig, ChunkingConfig, EmailConfig, EmbeddingsConfig, HttpServerConfig, LlmConfig,
        SearchConfig,
    };
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    struct StaticLlm(&'static str);

    #[async_trait]
    impl CompletionModel for StaticLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl CompletionModel for FailingLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(AskdeskError::Backend("completion endpoint down".to_string()))
        }
    }

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(AskdeskError::Backend("embedding endpoint down".to_string()))
        }
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(AskdeskError::Backend("embedding endpoint down".to_string()))
        }
    }

    /// Embedder that indexes fine but fails at query time
    struct QueryFailingEmbedder;

    #[async_trait]
    impl Embedder for QueryFailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(AskdeskError::Backend("embedding endpoint down".to_string()))
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn test_config(docs_dir: &std::path::Path, db_path: &std::path::Path) -> Config {
        Config {
            askdesk: AskdeskConfig {
                documents_dir: docs_dir.to_path_buf(),
                db_path: db_path.to_path_buf(),
            },
            embeddings: EmbeddingsConfig {
                model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
                api_key_env: "HUGGINGFACE_API_KEY".to_string(),
                dimensions: 2,
            },
            llm: LlmConfig {
                model: "llama-3.1-8b-instant".to_string(),
                api_key_env: "GROQ_API_KEY".to_string(),
                temperature: 0.0,
                max_tokens: 2048,
            },
            search: SearchConfig::default(),
            chunking: ChunkingConfig::default(),
            http_server: HttpServerConfig::default(),
            email: EmailConfig::default(),
        }
    }

    async fn engine_with(
        temp_dir: &TempDir,
        embedder: Option<Arc<dyn Embedder>>,
        llm: Arc<dyn CompletionModel>,
    ) -> ChatEngine {
        let docs_dir = temp_dir.path().join("documents");
        fs::create_dir_all(&docs_dir).unwrap();
        let db_path = temp_dir.path().join("chunks.db");
        let db = Db::new(&db_path);
        db.init_schema().await.unwrap();
        ChatEngine::new(test_config(&docs_dir, &db_path), db, embedder, llm)
    }

    fn write_docs(temp_dir: &TempDir) {
        let docs_dir = temp_dir.path().join("documents");
        fs::write(
            docs_dir.join("services.txt"),
            "We offer AI development, chatbot and automation services for modern businesses.",
        )
        .unwrap();
        fs::write(
            docs_dir.join("contact.txt"),
            "You can reach the team by email at hello@example.com.",
        )
        .unwrap();
    }

    const SERVICE_ANSWER: &str = "**Our Services**\n\nWe build AI solutions.\n\n- AI development\n- Automation";

    #[tokio::test]
    async fn test_query_hi_returns_greeting_with_four_buttons() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;

        let envelope = engine.query("hi").await;
        assert_eq!(envelope.answer, canned::GREETING_ANSWER);
        assert_eq!(envelope.quick_replies.len(), 4);
        assert!(!envelope.contact_form);
        assert!(!envelope.meeting_form);
    }

    #[tokio::test]
    async fn test_query_book_demo_triggers_meeting_form() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;

        let envelope = engine.query("I want to book a demo call").await;
        assert!(envelope.meeting_form);
        assert_eq!(envelope.answer, canned::MEETING_REQUEST_ANSWER);
    }

    #[tokio::test]
    async fn test_contact_request_triggers_contact_form() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;

        let envelope = engine.query("how do I reach your team").await;
        assert!(envelope.contact_form);
        assert_eq!(envelope.answer, canned::CONTACT_REQUEST_ANSWER);
    }

    #[tokio::test]
    async fn test_retrieval_before_initialization_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;

        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, canned::NOT_INITIALIZED_ANSWER);
        assert!(!envelope.quick_replies.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_builds_vector_index() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(
            &temp_dir,
            Some(Arc::new(UnitEmbedder)),
            Arc::new(StaticLlm(SERVICE_ANSWER)),
        )
        .await;
        write_docs(&temp_dir);

        engine.initialize_documents().await.unwrap();

        let (total, embedded) = engine.index_stats().await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(embedded, 2);

        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, SERVICE_ANSWER);
        assert!(!envelope.sources.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_degrades_to_keyword_on_embed_failure() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(
            &temp_dir,
            Some(Arc::new(FailingEmbedder)),
            Arc::new(StaticLlm(SERVICE_ANSWER)),
        )
        .await;
        write_docs(&temp_dir);

        engine.initialize_documents().await.unwrap();

        let (total, embedded) = engine.index_stats().await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(embedded, 0);

        // Keyword fallback still answers
        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, SERVICE_ANSWER);
        assert!(!envelope.answer.is_empty());
    }

    #[tokio::test]
    async fn test_vector_failure_at_query_time_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(
            &temp_dir,
            Some(Arc::new(QueryFailingEmbedder)),
            Arc::new(StaticLlm(SERVICE_ANSWER)),
        )
        .await;
        write_docs(&temp_dir);

        engine.initialize_documents().await.unwrap();
        let (_, embedded) = engine.index_stats().await.unwrap();
        assert_eq!(embedded, 2, "index was built in vector mode");

        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, SERVICE_ANSWER);
        assert!(!envelope.sources.is_empty());
    }

    #[tokio::test]
    async fn test_total_backend_failure_yields_degraded_envelope() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(
            &temp_dir,
            Some(Arc::new(FailingEmbedder)),
            Arc::new(FailingLlm),
        )
        .await;
        write_docs(&temp_dir);

        engine.initialize_documents().await.unwrap();

        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, canned::DEGRADED_ANSWER);
        assert!(!envelope.quick_replies.is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_query_returns_no_information() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;
        write_docs(&temp_dir);

        engine.initialize_documents().await.unwrap();

        let envelope = engine.query("asdkjasd").await;
        assert_eq!(envelope.answer, canned::NO_INFORMATION_ANSWER);
        assert!(envelope.sources.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(
            &temp_dir,
            Some(Arc::new(UnitEmbedder)),
            Arc::new(StaticLlm(SERVICE_ANSWER)),
        )
        .await;
        write_docs(&temp_dir);

        engine.initialize_documents().await.unwrap();
        let first = engine.db.load_chunks().await.unwrap();

        engine.initialize_documents().await.unwrap();
        let second = engine.db.load_chunks().await.unwrap();

        assert_eq!(first.len(), second.len());
        let first_sources: Vec<_> = first.iter().map(|c| c.source.clone()).collect();
        let second_sources: Vec<_> = second.iter().map(|c| c.source.clone()).collect();
        assert_eq!(first_sources, second_sources);
    }

    #[tokio::test]
    async fn test_initialize_empty_directory_fails_loudly() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;

        let err = engine.initialize_documents().await.unwrap_err();
        assert!(matches!(err, AskdeskError::Ingestion(_)));

        // The failed rebuild left the index untouched
        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, canned::NOT_INITIALIZED_ANSWER);
    }

    #[tokio::test]
    async fn test_restore_from_persisted_store() {
        let temp_dir = TempDir::new().unwrap();
        {
            let engine = engine_with(
                &temp_dir,
                Some(Arc::new(UnitEmbedder)),
                Arc::new(StaticLlm(SERVICE_ANSWER)),
            )
            .await;
            write_docs(&temp_dir);
            engine.initialize_documents().await.unwrap();
        }

        // Fresh engine over the same store: restores without re-ingesting
        let docs_dir = temp_dir.path().join("documents");
        let db_path = temp_dir.path().join("chunks.db");
        let engine = ChatEngine::new(
            test_config(&docs_dir, &db_path),
            Db::new(&db_path),
            Some(Arc::new(UnitEmbedder)),
            Arc::new(StaticLlm(SERVICE_ANSWER)),
        );
        engine.restore_or_initialize().await;

        let envelope = engine.query("what services do you offer").await;
        assert_eq!(envelope.answer, SERVICE_ANSWER);
    }

    #[tokio::test]
    async fn test_contact_us_menu_sets_contact_form() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;
        write_docs(&temp_dir);
        engine.initialize_documents().await.unwrap();

        let envelope = engine.query("contact us").await;
        assert!(envelope.contact_form);
        assert!(!envelope.answer.is_empty());
    }

    #[tokio::test]
    async fn test_canned_and_menu_paths_never_empty_quick_replies() {
        let temp_dir = TempDir::new().unwrap();
        let engine = engine_with(&temp_dir, None, Arc::new(StaticLlm(SERVICE_ANSWER))).await;
        write_docs(&temp_dir);
        engine.initialize_documents().await.unwrap();

        for input in [
            "hi",
            "who are you",
            "help",
            "thanks",
            "schedule a meeting",
            "know more about us",
            "products",
            "read an article",
            "our services",
            "contact us",
            "I want to book a demo call",
            "how do I reach your team",
        ] {
            let envelope = engine.query(input).await;
            assert!(
                !envelope.quick_replies.is_empty(),
                "empty quick replies for input {:?}",
                input
            );
            assert!(!envelope.answer.is_empty());
        }
    }
}
