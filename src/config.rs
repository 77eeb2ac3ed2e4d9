use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub askdesk: AskdeskConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

/// Askdesk-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AskdeskConfig {
    /// Directory containing the private document set (.pdf / .txt)
    pub documents_dir: PathBuf,
    pub db_path: PathBuf,
}

/// Embedding backend configuration (HuggingFace Inference API)
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

/// Language-model backend configuration (Groq chat completions)
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,
    /// Zero temperature for exact, consistent responses
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Retrieval configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Top-K for service and menu queries (wider context)
    #[serde(default = "default_service_k")]
    pub service_k: usize,
    /// Top-K for general queries (targeted context)
    #[serde(default = "default_general_k")]
    pub general_k: usize,
    /// Chunks taken by the keyword fallback, in original document order
    #[serde(default = "default_fallback_top_n")]
    pub fallback_top_n: usize,
    /// Per-chunk truncation when assembling fallback context
    #[serde(default = "default_fallback_context_chars")]
    pub fallback_context_chars: usize,
    /// Source content preview length in the response envelope
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

/// Chunking configuration (counted in characters)
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size_chars: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap_chars: usize,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// SMTP relay configuration for the contact/meeting form endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Known provider shorthand: gmail, google, microsoft, outlook
    #[serde(default)]
    pub provider: String,
    /// Explicit overrides; provider defaults apply when missing
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default = "default_sender_env")]
    pub sender_env: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
    #[serde(default = "default_recipient_env")]
    pub recipient_env: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            smtp_server: None,
            smtp_port: None,
            sender_env: default_sender_env(),
            password_env: default_password_env(),
            recipient_env: default_recipient_env(),
        }
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            service_k: default_service_k(),
            general_k: default_general_k(),
            fallback_top_n: default_fallback_top_n(),
            fallback_context_chars: default_fallback_context_chars(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size_chars: default_chunk_size(),
            chunk_overlap_chars: default_chunk_overlap(),
        }
    }
}

fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_embedding_key_env() -> String {
    "HUGGINGFACE_API_KEY".to_string()
}

fn default_dimensions() -> usize {
    384
}

fn default_llm_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_llm_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_service_k() -> usize {
    8
}

fn default_general_k() -> usize {
    4
}

fn default_fallback_top_n() -> usize {
    3
}

fn default_fallback_context_chars() -> usize {
    500
}

fn default_preview_chars() -> usize {
    200
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_http_port() -> u16 {
    5000
}

fn default_sender_env() -> String {
    "SENDER_EMAIL".to_string()
}

fn default_password_env() -> String {
    "SENDER_PASSWORD".to_string()
}

fn default_recipient_env() -> String {
    "COMPANY_EMAIL".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in ASKDESK_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("ASKDESK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    ///
    /// The LLM credential is fatal when missing; the embedding credential is optional
    /// and only downgrades the index to keyword mode at runtime.
    fn validate(&self) -> Result<()> {
        if !self.askdesk.documents_dir.exists() {
            anyhow::bail!(
                "documents_dir path does not exist: {}. Set documents_dir in config.toml to your document directory.",
                self.askdesk.documents_dir.display()
            );
        }

        if !self.askdesk.documents_dir.is_dir() {
            anyhow::bail!(
                "documents_dir must be a directory, not a file: {}",
                self.askdesk.documents_dir.display()
            );
        }

        // Dotenv is already loaded, so .env values are visible here
        std::env::var(&self.llm.api_key_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file or as an environment variable with your LLM API key.",
                self.llm.api_key_env
            )
        })?;

        if std::env::var(&self.embeddings.api_key_env).is_err() {
            log::warn!(
                "Environment variable {} not set - vector retrieval disabled, keyword fallback only",
                self.embeddings.api_key_env
            );
        }

        if self.search.service_k == 0 || self.search.general_k == 0 {
            anyhow::bail!("search.service_k and search.general_k must be greater than 0");
        }

        if self.chunking.chunk_size_chars == 0 {
            anyhow::bail!("chunking.chunk_size_chars must be greater than 0");
        }

        if self.chunking.chunk_overlap_chars >= self.chunking.chunk_size_chars {
            anyhow::bail!("chunking.chunk_overlap_chars must be less than chunk_size_chars");
        }

        Ok(())
    }

    /// Get chunk store path
    pub fn db_path(&self) -> &Path {
        &self.askdesk.db_path
    }

    /// Get the document directory path
    pub fn documents_dir(&self) -> &Path {
        &self.askdesk.documents_dir
    }
}
