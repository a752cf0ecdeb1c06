//! Digesto CLI
//!
//! Administrative console for the Digesto document-management API.

mod commands;
mod config;
mod context;
mod id_resolver;
mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "digesto")]
#[command(about = "Digesto document-management console", long_about = None)]
struct Cli {
    /// Digesto API URL
    #[arg(long, env = "DIGESTO_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Session file (defaults to <config dir>/digesto/session.json)
    #[arg(long, env = "DIGESTO_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "DIGESTO_TIMEOUT", default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with rendered output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "digesto_cli=warn,digesto_client=warn,digesto_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        session_file: cli.session_file,
        timeout: Duration::from_secs(cli.timeout),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
