//! seedsql-infer: Infer a schema descriptor from sample seed data
//!
//! The output can be saved and passed back to `seedsql --schema-file`.
//!
//! Usage:
//!   seedsql-infer bins.txt --table bins > schemas.json
//!   seedsql-infer bins.txt --table bins --compact

use anyhow::{Context, Result};
use clap::Parser;
use seedsql::infer_descriptor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seedsql-infer")]
#[command(about = "Infer a schema descriptor from brace-delimited seed data", long_about = None)]
struct Args {
    /// Input file with one `{ ... }` block per record
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Table name for the inferred schema
    #[arg(long, short = 't')]
    table: String,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let source = seedsql::read_source(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let schema = infer_descriptor(&args.table, &source)
        .with_context(|| format!("Failed to infer a schema from {}", args.input.display()))?;

    let output = if args.compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };

    println!("{}", output);

    Ok(())
}
