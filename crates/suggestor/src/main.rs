use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use suggestor::ops::Op;
use suggestor_models::config::SuggestorConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "suggestor", about = "Trade Suggestion Lifecycle Manager")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/suggestor.toml")]
    config: String,

    /// Read operations (one JSON object per line) from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Pretty-print each result JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let config_str = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config: {}", cli.config))?;
    let config: SuggestorConfig =
        toml::from_str(&config_str).with_context(|| "Failed to parse config")?;

    // Read the operation stream
    let ops_text = if let Some(input_path) = &cli.input {
        std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read input: {input_path}"))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };

    let manager = suggestor::build_manager(&config);

    // Expire overdue suggestions in the background while the stream runs
    let sweeper = suggestor::build_sweeper(&config, manager.clone());
    let cancel = sweeper.cancel_token();
    let sweeper_handle = tokio::spawn(async move { sweeper.run().await });

    for line in ops_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let op: Op = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse operation: {line}"))?;
        let result = suggestor::ops::apply(&manager, op).await?;

        // Output each result as JSON to stdout
        let output = if cli.pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{output}");
    }

    cancel.cancel();
    sweeper_handle.await.context("Sweeper task panicked")?;

    Ok(())
}
