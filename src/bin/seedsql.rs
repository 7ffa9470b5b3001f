//! seedsql: Convert brace-delimited seed data into SQL INSERT statements
//!
//! Usage:
//!   # Write waste_collection_entry.sql in the current directory
//!   seedsql waste_Data.txt --table waste_collection_entry
//!
//!   # Explicit output path, or print to stdout
//!   seedsql projects_Data.txt --table waste_management_projects -o seed/projects.sql
//!   seedsql projects_Data.txt --table waste_management_projects --stdout
//!
//!   # Extra tables described in a JSON schema file
//!   seedsql bins.txt --table bins --schema-file schemas.json
//!
//!   # Show every known table and its columns
//!   seedsql --list-schemas

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use seedsql::extract::{write_sql_file, SqlWriter};
use seedsql::{ExtractConfig, RecordExtractor, SchemaRegistry};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "seedsql")]
#[command(about = "Convert brace-delimited seed data into SQL INSERT statements", long_about = None)]
struct Args {
    /// Input file with one `{ ... }` block per record
    #[arg(value_name = "FILE", required_unless_present = "list_schemas")]
    input: Option<PathBuf>,

    /// Target table; selects the schema
    #[arg(long, short = 't', required_unless_present = "list_schemas")]
    table: Option<String>,

    /// Output file (default: <table>.sql)
    #[arg(long, short = 'o', conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print statements to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// JSON file with additional schema descriptors
    #[arg(long, value_name = "FILE")]
    schema_file: Option<PathBuf>,

    /// Fail when the input contains no blocks
    #[arg(long)]
    require_records: bool,

    /// End the output with a newline
    #[arg(long)]
    trailing_newline: bool,

    /// List known tables and exit
    #[arg(long)]
    list_schemas: bool,

    /// More logging (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut registry = SchemaRegistry::builtin();
    if let Some(schema_file) = &args.schema_file {
        registry
            .load_file(schema_file)
            .with_context(|| format!("Failed to load schemas from {}", schema_file.display()))?;
    }

    if args.list_schemas {
        let mut stdout = std::io::stdout().lock();
        for schema in registry.schemas() {
            let columns = schema
                .fields
                .iter()
                .map(|f| {
                    let optional = if f.required { "" } else { "?" };
                    format!("{}{}:{}", f.name, optional, f.kind)
                })
                .collect::<Vec<_>>();
            writeln!(stdout, "{} ({})", schema.table, columns.join(", "))?;
        }
        return Ok(());
    }

    let (Some(input), Some(table)) = (args.input, args.table) else {
        anyhow::bail!("an input file and --table are required");
    };

    let schema = registry.resolve(&table)?;
    let config = ExtractConfig {
        require_records: args.require_records,
        trailing_newline: args.trailing_newline,
        ..ExtractConfig::default()
    };

    let source = seedsql::read_source(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let extractor = RecordExtractor::new(schema, config);
    let statements = extractor
        .extract_statements(&source)
        .with_context(|| format!("Failed to extract records from {}", input.display()))?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        SqlWriter::new(&mut stdout, extractor.config()).write_statements(&statements)?;
        if !extractor.config().trailing_newline && !statements.is_empty() {
            writeln!(stdout)?;
        }
        stdout.flush()?;
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.sql", schema.table)));
    write_sql_file(&output, &statements, extractor.config())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("✅ {} INSERT statements saved to {}", statements.len(), output.display());
    Ok(())
}
