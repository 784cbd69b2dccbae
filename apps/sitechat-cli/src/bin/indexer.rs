use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sitechat_cli::{init_tracing, load_settings};
use sitechat_embed::load_embedder;
use sitechat_retrieval::build_store;

#[derive(Parser, Debug)]
#[command(name = "sitechat-indexer", about = "Chunk, embed and store the crawled site text")]
struct Cli {
    /// Crawler output to index. Defaults to `store.source`.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Store file to write. Defaults to `store.path`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory holding `config.toml`.
    #[arg(long, env = "SITECHAT_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli.config_dir)?;
    let input = cli
        .input
        .or_else(|| settings.store.source.clone())
        .context("no input file: pass --input or set store.source")?;
    let output = cli.output.unwrap_or_else(|| settings.store.path.clone());

    println!("sitechat indexer\n================");
    println!("Input:  {}", input.display());
    println!("Output: {}", output.display());

    let embedder = load_embedder(&settings.embedding)?;
    let record = build_store(&settings, embedder.as_ref(), &input, &output)?;

    println!("\nIndexed {} chunks (dimension {}, model {})", record.len(), record.dimension, record.model);
    println!("Query with: sitechat query '<text>'");
    Ok(())
}
