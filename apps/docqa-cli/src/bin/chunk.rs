use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docqa_core::chunker::ParagraphChunker;
use docqa_core::config::Config;
use docqa_core::traits::Chunker;

/// Split one extracted text file into overlapping chunks and print them as JSON.
#[derive(Parser, Debug)]
#[command(name = "docqa-chunk", version)]
struct Cli {
    file: PathBuf,

    /// Document id used in chunk ids (defaults to the file stem)
    #[arg(long)]
    doc_id: Option<String>,

    /// Overrides chunking.chunk_size
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Overrides chunking.overlap
    #[arg(long)]
    overlap: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let mut chunking = Config::load()?.settings()?.chunking;
    if let Some(n) = cli.chunk_size { chunking.chunk_size = n; }
    if let Some(n) = cli.overlap { chunking.overlap = n; }
    chunking.validate()?;

    let text = fs::read_to_string(&cli.file).with_context(|| format!("reading {}", cli.file.display()))?;
    let doc_id = match cli.doc_id {
        Some(id) => id,
        None => cli.file.file_stem().map(|s| s.to_string_lossy().to_string()).context("file has no name")?,
    };

    let chunks = ParagraphChunker::new(chunking).chunk(&text, &doc_id);
    println!("{}", serde_json::to_string_pretty(&chunks)?);
    Ok(())
}
