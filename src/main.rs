use anyhow::Result;
use askdesk::chat::ChatEngine;
use askdesk::db::Db;
use askdesk::server::HttpServer;
use askdesk::Config;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "askdesk")]
#[command(about = "Customer-facing chatbot backend over a local document base")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Ingest and index the document directory, then exit
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let config = Config::load()?;

    log::info!("Starting askdesk v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Documents: {}", config.documents_dir().display());
    log::info!("Database: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    db.init_schema().await?;

    let engine = Arc::new(ChatEngine::from_config(config.clone(), db)?);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            engine.restore_or_initialize().await;
            let server = HttpServer::new(Arc::clone(&engine), config);
            server.run().await?;
        }
        Command::Init => {
            engine.initialize_documents().await?;
            let (total, embedded) = engine.index_stats().await?;
            log::info!("Indexed {} chunks ({} embedded)", total, embedded);
        }
    }

    Ok(())
}
