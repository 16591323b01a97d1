//! Command-line interface for vector-connect
//!
//! # Usage Examples
//!
//! ```bash
//! # Preview what a configuration would ship: read JSONL records and print
//! # the resulting upload units as JSON lines
//! vector-connect --topic orders --input orders.jsonl \
//!   --document-id-strategy field --document-id-field order_id \
//!   --vector-strategy field --vector-field embedding
//!
//! # Same, from stdin, converting only (nothing printed)
//! cat orders.jsonl | vector-connect --topic orders --dry-run
//!
//! # Route topics into prefixed collections at a stricter consistency
//! vector-connect --topic orders --input orders.jsonl \
//!   --collection-mapping 'Docs_${topic}' --consistency-level all
//! ```

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use vector_connect::{jsonl, ConsoleStore, SinkConfig, SinkTask};

#[derive(Parser)]
#[command(name = "vector-connect")]
#[command(about = "Convert schema-tagged records into property documents and ship them to a vector store")]
#[command(long_about = None)]
struct Cli {
    /// Topic the records are attributed to
    #[arg(long)]
    topic: String,

    /// Newline-delimited JSON input file (stdin when omitted)
    #[arg(long)]
    input: Option<std::path::PathBuf>,

    /// Convert and batch without printing upload units
    #[arg(long)]
    dry_run: bool,

    /// Connector configuration
    #[command(flatten)]
    config: SinkConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let records = match &cli.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open input file {path:?}"))?;
            jsonl::read_records(std::io::BufReader::new(file), &cli.topic)?
        }
        None => jsonl::read_records(std::io::stdin().lock(), &cli.topic)?,
    };
    tracing::info!("Read {} records for topic {}", records.len(), cli.topic);

    if cli.dry_run {
        tracing::info!("Running in dry-run mode - no upload units will be printed");
    }

    let store = Arc::new(ConsoleStore::new(cli.dry_run));
    let mut task = SinkTask::new(&cli.config, Arc::clone(&store))
        .context("invalid connector configuration")?;

    let total = records.len();
    task.put(records).await.context("delivery failed")?;
    task.stop().await.context("shutdown failed")?;

    tracing::info!("Shipped {} of {} records", store.written(), total);
    Ok(())
}
