use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use termsift::dedup::remove_duplicates;
use termsift::{DocId, DocumentStatus, ExecutionPolicy, StopWordSet};
use termsift_indexer::build_server;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "termsift-indexer")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    /// Input path (file or directory of .json/.jsonl)
    #[arg(long, global = true, default_value = "./documents.jsonl")]
    input: PathBuf,
    /// Space-separated stop words; the built-in English list when omitted
    #[arg(long, global = true)]
    stop_words: Option<String>,
    /// Fan per-term work out over the rayon thread pool
    #[arg(long, global = true, default_value_t = false)]
    parallel: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
    },
    /// Print the query terms found in one document
    Match {
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocId,
    },
    /// Remove documents whose term sets repeat an earlier document
    Duplicates,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let stop_words = match &cli.stop_words {
        Some(text) => StopWordSet::from_text(text)?,
        None => StopWordSet::english(),
    };
    let policy = if cli.parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };
    let mut server = build_server(&cli.input, stop_words)?;

    let output = match cli.command {
        Commands::Search { query, status } => {
            let status = DocumentStatus::from(status);
            let found = server.find_top_documents_with_policy(policy, &query, |_, s, _| s == status)?;
            json!({ "query": query, "results": found })
        }
        Commands::Match { query, id } => {
            let (terms, status) = server.match_document_with_policy(policy, &query, id)?;
            json!({ "id": id, "terms": terms, "status": status })
        }
        Commands::Duplicates => {
            let removed = remove_duplicates(&mut server);
            json!({ "removed": removed, "remaining": server.document_count() })
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
