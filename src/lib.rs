pub mod backends;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod index;
pub mod ingest;
pub mod mailer;
pub mod server;

pub use config::Config;
pub use error::{AskdeskError, Result};
