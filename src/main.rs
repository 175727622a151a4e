//! tweetlens - batched tweet dashboards from the terminal
//!
//! Main entry point for the tweetlens command-line tool.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use tracing::info;

use tweetlens::ask::{build_prompt, CompletionClient, SUGGEST_PROMPT, SUMMARIZE_PROMPT};
use tweetlens::batches::batches_for;
use tweetlens::config::Config;
use tweetlens::fetcher::fetch_and_map;
use tweetlens::insights::{compute_kpis, selected_charts, AVAILABLE_SERIES, DEFAULT_SERIES};
use tweetlens::logging::init_cli_logging;
use tweetlens::sentiment::Lexicon;
use tweetlens::server::{self, AppState};
use tweetlens::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_logging(cli.quiet, cli.verbose);

    match &cli.command {
        Commands::Import(args) => cmd_import(&cli, args),
        Commands::Batches(args) => cmd_batches(&cli, args),
        Commands::Tweets(args) => cmd_tweets(&cli, args),
        Commands::Insights(args) => cmd_insights(&cli, args),
        Commands::Ask(args) => cmd_ask(&cli, args),
        Commands::Serve(args) => cmd_serve(&cli, args),
        Commands::Dashboard(args) => cmd_dashboard(&cli, args),
        Commands::Config(args) => cmd_config(args),
        Commands::Completions(args) => cmd_completions(args.clone()),
    }
}

fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load();
    if let Some(db) = &cli.db {
        config.paths.db = Some(db.clone());
    }
    config
}

fn get_db_path(cli: &Cli) -> PathBuf {
    cli.db.clone().unwrap_or_else(|| load_config(cli).db_path())
}

fn selected_batches(batches: &[u32]) -> Vec<u32> {
    if batches.is_empty() {
        vec![1]
    } else {
        batches.to_vec()
    }
}

fn open_store(cli: &Cli) -> Result<Storage> {
    let db_path = get_db_path(cli);
    let storage = Storage::open_existing(&db_path)?;
    Ok(storage)
}

fn cmd_import(cli: &Cli, args: &cli::ImportArgs) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("File does not exist: {}", args.file.display());
    }

    let db_path = get_db_path(cli);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("{}", "Importing tweets...".bold().cyan());
    println!("  File: {}", args.file.display());
    println!("  Database: {}", db_path.display());
    println!();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Parsing...");

    let tweets = importer::parse_file(&args.file)?;

    let mut storage = Storage::open(&db_path)?;
    if args.force {
        let cleared = storage.clear()?;
        info!("Cleared {} existing tweets", cleared);
    }

    spinner.set_message("Storing...");
    let stored = storage.store_tweets(&tweets)?;
    spinner.finish_and_clear();

    println!("  {} Imported {} tweets", "✓".green(), format_number(stored as i64));
    let total = storage.count_tweets()?;
    println!(
        "  {} Store now holds {} tweets",
        "✓".green(),
        format_number(total as i64)
    );
    Ok(())
}

fn cmd_batches(cli: &Cli, args: &cli::BatchesArgs) -> Result<()> {
    let config = load_config(cli);
    let batch_size = args.batch_size.unwrap_or(config.batching.batch_size);
    let storage = open_store(cli)?;

    let batches = batches_for(&storage, batch_size)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&batches)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&batches)?),
        OutputFormat::Text => {
            if batches.is_empty() {
                println!("{}", "No batches available. Import tweets first.".dimmed());
                return Ok(());
            }
            println!("{}", "Batches".bold().cyan());
            for batch in &batches {
                println!("  {}", batch.label);
            }
        }
    }
    Ok(())
}

fn cmd_tweets(cli: &Cli, args: &cli::TweetsArgs) -> Result<()> {
    let config = load_config(cli);
    let storage = open_store(cli)?;
    let numbers = selected_batches(&args.batches);

    let tweets = fetch_and_map(
        &numbers,
        config.batching.batch_size,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );

    let mut feed = feed::TweetFeed::with_page_size(tweets, config.batching.page_size);
    feed.sort_by(args.sort);
    feed.go_to(args.page);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(feed.page_slice())?),
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(feed.page_slice())?);
        }
        OutputFormat::Text => {
            if feed.is_empty() {
                println!("{}", "No tweets in the selected batches.".dimmed());
                return Ok(());
            }
            for tweet in feed.page_slice() {
                println!(
                    "{} {} {} [{}]",
                    tweet.name.bold(),
                    format!("@{}", tweet.username).dimmed(),
                    tweet.display_time.dimmed(),
                    tweet.sentiment,
                );
                println!("  {}", tweet.text);
                println!(
                    "  {} likes  {} retweets  {} replies  {} views\n",
                    format_number(tweet.likes).cyan(),
                    format_number(tweet.retweets).cyan(),
                    format_number(tweet.replies).cyan(),
                    format_number(tweet.views).cyan(),
                );
            }
            println!(
                "Page {}/{} ({} tweets, sorted by {})",
                feed.current_page(),
                feed.total_pages(),
                feed.len(),
                feed.sort_key()
            );
        }
    }
    Ok(())
}

fn cmd_insights(cli: &Cli, args: &cli::InsightsArgs) -> Result<()> {
    let config = load_config(cli);
    let storage = open_store(cli)?;
    let numbers = selected_batches(&args.batches);

    let tweets = fetch_and_map(
        &numbers,
        config.batching.batch_size,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );

    let kpis = compute_kpis(&tweets);
    let chart_names: Vec<String> = args.charts.clone().unwrap_or_else(|| {
        DEFAULT_SERIES.iter().map(ToString::to_string).collect()
    });
    let charts = selected_charts(&tweets, &chart_names);

    match cli.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(&serde_json::json!({ "kpis": kpis, "charts": charts }))?
        ),
        OutputFormat::JsonPretty => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "kpis": kpis, "charts": charts }))?
        ),
        OutputFormat::Text => {
            println!("{}", "Insights".bold().cyan());
            println!("{}", "─".repeat(40));
            println!("  {:<22} {}", "Total tweets:", kpis.total_tweets);
            println!("  {:<22} {:.1}", "Avg likes:", kpis.avg_likes);
            println!("  {:<22} {:.1}", "Avg retweets:", kpis.avg_retweets);
            println!("  {:<22} {:.1}", "Avg replies:", kpis.avg_replies);
            println!("  {:<22} {:.1}%", "Positive:", kpis.positive_pct);
            println!("  {:<22} {:.1}%", "Neutral:", kpis.neutral_pct);
            println!("  {:<22} {:.1}%", "Negative:", kpis.negative_pct);
            println!(
                "  {:<22} {}",
                "Total engagements:",
                format_number(kpis.total_engagements)
            );
            for chart in &charts {
                println!("\n{}", chart.title.bold());
                for dataset in &chart.datasets {
                    println!(
                        "  {}: {:?}",
                        dataset.label,
                        dataset.data
                    );
                }
            }
            let unknown: Vec<&str> = chart_names
                .iter()
                .map(String::as_str)
                .filter(|n| !AVAILABLE_SERIES.contains(n))
                .collect();
            if !unknown.is_empty() {
                println!(
                    "\n{} unknown charts skipped: {}",
                    "!".yellow(),
                    unknown.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn cmd_ask(cli: &Cli, args: &cli::AskArgs) -> Result<()> {
    let config = load_config(cli);
    let storage = open_store(cli)?;
    let numbers = selected_batches(&args.batches);

    let question = if args.summarize {
        SUMMARIZE_PROMPT.to_string()
    } else if args.suggest {
        SUGGEST_PROMPT.to_string()
    } else {
        args.question
            .clone()
            .ok_or(error::LensError::PromptRequired)?
    };

    let tweets = fetch_and_map(
        &numbers,
        config.batching.batch_size,
        |offset, limit| storage.window(offset, limit),
        &Lexicon,
    );
    let prompt = build_prompt(&question, &tweets);

    let client = CompletionClient::new(
        config.completion.endpoint.clone(),
        config.completion.model.clone(),
        config.api_key(),
    )?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Waiting for the model...");

    let runtime = tokio::runtime::Runtime::new()?;
    let answer = runtime.block_on(client.complete(&prompt));
    spinner.finish_and_clear();

    match answer {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            if let Some(suggestion) = e.suggestion() {
                eprintln!("{}: {suggestion}", "Hint".yellow());
            }
            Err(e.into())
        }
    }
}

fn cmd_serve(cli: &Cli, args: &cli::ServeArgs) -> Result<()> {
    let config = load_config(cli);
    let host = args.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let state = AppState::from_config(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(state, &host, port))?;
    Ok(())
}

fn cmd_dashboard(cli: &Cli, args: &cli::DashboardArgs) -> Result<()> {
    let config = load_config(cli);
    let storage = open_store(cli)?;
    dashboard::run(storage, config, &args.batches)
}

fn cmd_config(args: &cli::ConfigArgs) -> Result<()> {
    if args.init {
        let config = Config::default();
        config.save()?;
        if let Some(path) = Config::user_config_path() {
            println!("{} Wrote default config to {}", "✓".green(), path.display());
        }
        return Ok(());
    }

    // Default action is show.
    let config = Config::load();
    println!("{}", "Current configuration".bold().cyan());
    println!("{}", toml::to_string_pretty(&config)?);
    println!("  Database path: {}", config.db_path().display());
    if let Some(path) = Config::user_config_path() {
        println!("  Config file:   {}", path.display());
    }
    Ok(())
}

fn cmd_completions(args: cli::CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
