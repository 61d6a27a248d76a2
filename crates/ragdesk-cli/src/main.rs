use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod app;

#[derive(Parser)]
#[command(name = "ragdesk")]
#[command(about = "Ragdesk - multi-session chat client for a retrieval QA service")]
#[command(version)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Base URL of the query service
    #[arg(long)]
    api_url: Option<String>,

    /// Where conversations are stored
    #[arg(long)]
    sessions_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = ragdesk_core::Settings::load();

    if let Some(url) = cli.api_url {
        settings.api.base_url = url;
    }
    if let Some(path) = cli.sessions_file {
        settings.storage.sessions_path = Some(path);
    }

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(&settings, &prompt).await?;
    } else {
        app::run_repl(settings).await?;
    }

    Ok(())
}
