use thiserror::Error;

/// Main error type for askdesk
#[derive(Error, Debug)]
pub enum AskdeskError {
    /// Document ingestion errors (missing directory, no eligible files, unreadable source)
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Remote backend failures (embedding or completion call) — recovered via the
    /// keyword fallback, never surfaced across the query boundary
    #[error("Backend unavailable: {0}")]
    Backend(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chunk store errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using AskdeskError
pub type Result<T> = std::result::Result<T, AskdeskError>;
