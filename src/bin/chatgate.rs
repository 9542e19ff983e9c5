//! chatgate binary
//!
//! Serves `/models` and `/chat` in front of the upstream completion API.

use anyhow::Result;
use chatgate::config::{ConfigLoader, GatewayConfig};
use chatgate::router::AliasRegistry;
use chatgate::server::start_server;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// chatgate: chat completion gateway with API key rotation
#[derive(Parser, Debug)]
#[command(name = "chatgate", version)]
#[command(about = "Chat completion gateway with model aliases and API key rotation", long_about = None)]
struct Args {
    /// Read variables from this dotenv file instead of `.env` + process environment
    #[arg(short, long)]
    env_file: Option<PathBuf>,

    /// Host to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Upstream request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // `.env` goes into the process environment before the filter reads RUST_LOG
    let dotenv_path = match &args.env_file {
        Some(_) => None,
        None => dotenvy::dotenv().ok(),
    };

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Some(path) = &dotenv_path {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let loader = match &args.env_file {
        Some(path) => ConfigLoader::from_env_file(path)?,
        None => ConfigLoader::from_env()?,
    };
    let mut config = loader.into_config();

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    // Refuse to start with no keys
    config.validate()?;

    if args.validate {
        print_summary(&config);
        return Ok(());
    }

    start_server(config).await
}

fn print_summary(config: &GatewayConfig) {
    let registry = AliasRegistry::builtin();

    println!("Configuration validation:");
    println!("  Listen: {}", config.listen_addr());
    println!("  Upstream: {}", config.completions_url());
    println!("  Timeout: {}s", config.timeout_secs);
    println!("  API keys: {}", config.api_keys.len());
    println!("  Models: {}", registry.aliases().join(", "));
    println!("\nConfiguration is valid");
}
