use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wireidx::{Analyzer, ComparisonReport, CorpusReader, Engine, IndexSchema, Storage};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tagged newswire corpus indexer and analyzer comparison", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a single index over the standard newswire fields
    Build {
        /// Directory containing the corpus files
        #[arg(short, long)]
        corpus: PathBuf,

        /// Directory the index is written to
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Build four indexes under the four analyzers and print a
    /// comparison report
    Compare {
        /// Directory containing the corpus files
        #[arg(short, long)]
        corpus: PathBuf,

        /// Directory the indexes and report are written to
        #[arg(short, long)]
        output: PathBuf,

        /// Field whose statistics are reported
        #[arg(long, default_value = "TEXT")]
        field: String,

        /// Probe term reported per variant
        #[arg(long, default_value = "new")]
        term: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build { corpus, output } => build(corpus, output),
        Command::Compare {
            corpus,
            output,
            field,
            term,
        } => compare(corpus, output, field, term),
    }
}

/// Validate paths and wire the engine up. Path problems are fatal
/// before any processing begins.
fn open_engine(corpus: &PathBuf, output: &PathBuf) -> Result<Engine> {
    let corpus = CorpusReader::new(corpus)?;
    fs::create_dir_all(output)
        .with_context(|| format!("creating output directory {}", output.display()))?;
    let storage = Storage::open(output.join("indexes"))?;
    Ok(Engine::new(corpus).with_storage(storage))
}

fn build(corpus: PathBuf, output: PathBuf) -> Result<()> {
    let engine = open_engine(&corpus, &output)?;
    let index = engine.build(&IndexSchema::newswire(), Analyzer::Standard)?;
    println!("Number of documents in the corpus: {}", index.doc_count());
    Ok(())
}

fn compare(corpus: PathBuf, output: PathBuf, field: String, term: String) -> Result<()> {
    let engine = open_engine(&corpus, &output)?;
    let indexes = engine.compare(&field)?;

    let report = ComparisonReport::new(&indexes, &field, &term);
    print!("{}", report.render());

    let json = serde_json::to_string_pretty(&report)?;
    let report_path = output.join("report.json");
    fs::write(&report_path, json)
        .with_context(|| format!("writing {}", report_path.display()))?;
    tracing::info!(path = %report_path.display(), "report written");
    Ok(())
}
