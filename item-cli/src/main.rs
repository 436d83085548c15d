//! CLI tool for probing item endpoints with HEAD and GET.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use item_client::{ClientConfig, ItemClient, DEFAULT_MAX_ERROR_BODY_BYTES};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL that item paths are appended to
    #[arg(long, env = "ITEM_CLIENT_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "ITEM_CLIENT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Maximum error body bytes shown in failure messages (0 always uses the canned message)
    #[arg(long, default_value_t = DEFAULT_MAX_ERROR_BODY_BYTES)]
    max_error_body_bytes: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetches item metadata with a HEAD request
    Head {
        /// Item path, e.g. /somewhere-200
        path: String,
    },
    /// Fetches item metadata and content with a GET request
    Get {
        /// Item path, e.g. /somewhere-200
        path: String,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            max_error_body_bytes: self.max_error_body_bytes,
        }
    }
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serializing output failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let client = ItemClient::new(cli.client_config()).context("building HTTP client failed")?;

    match &cli.command {
        Commands::Head { path } => {
            info!("HEAD {}{}", cli.base_url, path);
            let metadata = client.head(path).await.with_context(|| format!("HEAD {path}"))?;
            println!("{}", render(&metadata)?);
        },
        Commands::Get { path } => {
            info!("GET {}{}", cli.base_url, path);
            let item = client.get(path).await.with_context(|| format!("GET {path}"))?;
            println!("{}", render(&item)?);
        },
    }

    Ok(())
}
