use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sitechat_chat::{answer, OpenRouterClient};
use sitechat_cli::{format_hits, init_tracing, load_settings};
use sitechat_embed::load_embedder;
use sitechat_retrieval::Retriever;

#[derive(Parser, Debug)]
#[command(name = "sitechat", about = "Ask questions grounded in the indexed site")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding `config.toml`.
    #[arg(long, global = true, env = "SITECHAT_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chunks nearest to a query.
    Query {
        text: String,
        /// Number of chunks. Defaults to `retrieval.top_k`.
        #[arg(short)]
        k: Option<usize>,
    },
    /// Answer a question using retrieved chunks as context.
    Ask {
        question: String,
        #[arg(short)]
        k: Option<usize>,
        /// Print the retrieved context before the answer.
        #[arg(long)]
        show_context: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli.config_dir)?;
    let embedder = load_embedder(&settings.embedding)?;
    let metric = settings.index.metric;
    let retriever = Retriever::new(embedder, settings);

    match cli.command {
        Command::Query { text, k } => {
            let k = k.unwrap_or(retriever.settings().retrieval.top_k);
            let hits = retriever.retrieve(&text, k)?;
            println!("Found {} chunks for \"{}\" ({})", hits.len(), text, metric.polarity());
            if !hits.is_empty() {
                println!("{}", format_hits(&hits, 300));
            }
        }
        Command::Ask { question, k, show_context } => {
            let k = k.unwrap_or(retriever.settings().retrieval.top_k);
            let hits = retriever.retrieve(&question, k)?;
            if show_context {
                println!("Context ({}):\n{}\n", metric.polarity(), format_hits(&hits, 300));
            }
            let completion = &retriever.settings().completion;
            let client = OpenRouterClient::from_settings(completion)?;
            let context = Retriever::context(&hits);
            let reply = tokio::runtime::Runtime::new()?
                .block_on(async { answer(&client, completion, &question, &context).await })?;
            println!("{reply}");
        }
    }
    Ok(())
}
