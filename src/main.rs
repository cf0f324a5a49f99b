//! Quillpad - blog post AI assistance service
//!
//! CLI entry point for the Quillpad server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use quillpad::cli;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quillpad=info,quillpad_quota=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = cli::Cli::parse();

    if cli.command.is_some() && !std::path::Path::new(".env").exists() {
        warn!(".env file not found; OPENAI_API_KEY must come from the environment.");
    }

    cli::run(cli).await
}
