use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docqa_core::config::{resolve_with_base, Config};
use docqa_core::data_processor::DataProcessor;
use docqa_core::traits::Ranker;
use docqa_core::types::ChunkFilter;
use docqa_text::LexicalSearchEngine;

/// Chunk a directory of extracted documents and print the chunks most relevant to a question.
#[derive(Parser, Debug)]
#[command(name = "docqa", version)]
struct Cli {
    /// Directory laid out as <country>/<doc_type>/<name>.txt
    data_dir: Option<PathBuf>,

    /// The question to rank chunks against
    #[arg(short, long)]
    query: String,

    /// Number of chunks to return (overrides ranking.top_k)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Only consider documents from this country ("All" for every country)
    #[arg(long)]
    country: Option<String>,

    /// Only consider documents of this type ("All" for every type)
    #[arg(long)]
    doc_type: Option<String>,

    /// Emit results as JSON
    #[arg(long)]
    json: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose { EnvFilter::new("info") } else { EnvFilter::from_default_env() };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => {
            let dir: String = config.get("data.raw_txt_dir").unwrap_or_else(|_| "data/txt".to_string());
            resolve_with_base(&std::env::current_dir()?, dir)
        }
    };

    let corpus = DataProcessor::with_config(settings.chunking).process_directory(&data_dir)?;
    let corpus = ChunkFilter { country: cli.country, doc_type: cli.doc_type }.apply(corpus);

    let mut ranking = settings.ranking;
    if let Some(k) = cli.top_k { ranking.top_k = k; }
    let engine = LexicalSearchEngine::with_config(ranking);
    let hits = engine.rank(&cli.query, &corpus);

    if cli.json {
        let results: Vec<_> = hits.iter().map(|h| &corpus[h.position]).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Query: {} ({} candidate chunks)", cli.query, corpus.len());
    if hits.iter().all(|h| h.score == 0) && !hits.is_empty() {
        println!("No lexical match; showing leading chunks.");
    }
    for (i, hit) in hits.iter().enumerate() {
        let chunk = &corpus[hit.position];
        println!("\n{:>2}. score={} id={} source={}", i + 1, hit.score, hit.chunk_id, chunk.source_label());
        println!("    {}", chunk.chunk.preview);
    }
    Ok(())
}
