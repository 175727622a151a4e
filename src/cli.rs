//! CLI definitions for tweetlens.
//!
//! Uses clap for argument parsing with derive macros.

use crate::model::SortKey;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tweetlens - batched tweet dashboards from the terminal
#[derive(Parser, Debug)]
#[command(name = "tweetlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Batched tweet dashboards: KPIs, sentiment, and a sortable feed")]
#[command(long_about = r#"
tweetlens - turn a store of tweets into dashboard data from the terminal.

Features:
  - Fixed-size batches over a timestamp-descending tweet store
  - Lexicon-based sentiment labels on every tweet
  - KPIs, engagement charts, and sentiment breakdowns
  - Sortable, paginated feed with an interactive dashboard
  - Ask an OpenAI-compatible model questions about the selection
  - JSON HTTP API for web frontends

Quick start:
  1. Import tweets: tweetlens import tweets.json
  2. List batches:  tweetlens batches
  3. Explore:       tweetlens dashboard
"#)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, env = "TWEETLENS_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Be verbose (show debug info)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import tweets from a JSON or JSONL file
    Import(ImportArgs),

    /// List the available batches
    Batches(BatchesArgs),

    /// Show tweets from the selected batches
    Tweets(TweetsArgs),

    /// Show KPIs and chart data for the selected batches
    Insights(InsightsArgs),

    /// Ask a model a question about the selected batches
    Ask(AskArgs),

    /// Serve the JSON HTTP API
    Serve(ServeArgs),

    /// Interactive dashboard session
    Dashboard(DashboardArgs),

    /// Show or manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the tweets file (JSON array or JSONL)
    pub file: PathBuf,

    /// Clear existing tweets before importing
    #[arg(long, short = 'F')]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct BatchesArgs {
    /// Records per batch window
    #[arg(long, env = "TWEETLENS_BATCH_SIZE")]
    pub batch_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct TweetsArgs {
    /// Batches to show, comma separated (defaults to batch 1)
    #[arg(long, short = 'b', value_delimiter = ',')]
    pub batches: Vec<u32>,

    /// Sort key for the feed
    #[arg(long, short = 's', default_value = "latest")]
    pub sort: SortKey,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: usize,
}

#[derive(Args, Debug)]
pub struct InsightsArgs {
    /// Batches to aggregate, comma separated (defaults to batch 1)
    #[arg(long, short = 'b', value_delimiter = ',')]
    pub batches: Vec<u32>,

    /// Charts to include, comma separated
    #[arg(long, short = 'c', value_delimiter = ',')]
    pub charts: Option<Vec<String>>,
}

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to ask about the selected tweets
    pub question: Option<String>,

    /// Batches to include as context, comma separated (defaults to batch 1)
    #[arg(long, short = 'b', value_delimiter = ',')]
    pub batches: Vec<u32>,

    /// Use the canned summarize prompt
    #[arg(long, conflicts_with_all = ["question", "suggest"])]
    pub summarize: bool,

    /// Use the canned tweet-ideas prompt
    #[arg(long, conflicts_with = "question")]
    pub suggest: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address
    #[arg(long, env = "TWEETLENS_HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(long, short = 'p', env = "TWEETLENS_PORT")]
    pub port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Batches to load initially, comma separated (defaults to batch 1)
    #[arg(long, short = 'b', value_delimiter = ',')]
    pub batches: Vec<u32>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Write a default config file to the standard location
    #[arg(long)]
    pub init: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}
