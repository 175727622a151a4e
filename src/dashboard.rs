//! Interactive dashboard REPL.
//!
//! A command-driven shell over the feed view-model and insights state.
//! Everything except `select`/`toggle` is a pure local state update;
//! changing the batch selection is the one command that goes back to
//! the store.

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as RlConfig, EditMode, Editor};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::ask::{build_prompt, CompletionClient};
use crate::batches::batches_for;
use crate::config::Config;
use crate::feed::{PageItem, TweetFeed};
use crate::fetcher::fetch_and_map;
use crate::insights::{compute_kpis, selected_charts, ChartSeries, InsightsState};
use crate::model::SortKey;
use crate::sentiment::Lexicon;
use crate::{format_number, Storage};

/// Dashboard session state.
pub struct DashboardSession {
    storage: Storage,
    config: Config,
    feed: TweetFeed,
    insights: InsightsState,
    runtime: tokio::runtime::Runtime,
    history_path: PathBuf,
}

#[derive(Debug)]
enum Command {
    Sort { key: SortKey },
    Page { page: usize },
    Next,
    Prev,
    First,
    Last,
    Show,
    Batches,
    Select { batches: Vec<u32> },
    Toggle { batch: u32 },
    Chart { name: String },
    Insights,
    Ask { question: String },
    Help { command: Option<String> },
    Quit,
}

/// Run the dashboard session.
///
/// # Errors
///
/// Returns an error if readline setup, history persistence, or command
/// execution fails.
pub fn run(storage: Storage, config: Config, initial_batches: &[u32]) -> Result<()> {
    let rl_config = RlConfig::builder()
        .history_ignore_space(true)
        .history_ignore_dups(true)?
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(rl_config)?;

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tweetlens_history");

    let runtime = tokio::runtime::Runtime::new()?;

    let mut insights = InsightsState::default();
    if !initial_batches.is_empty() {
        insights.selected_batches = initial_batches.iter().copied().collect();
    }

    let feed = TweetFeed::with_page_size(Vec::new(), config.batching.page_size);
    let mut session = DashboardSession {
        storage,
        config,
        feed,
        insights,
        runtime,
        history_path,
    };
    session.refetch();

    let _ = rl.load_history(&session.history_path);

    info!("Starting dashboard session");
    println!(
        "{}",
        "tweetlens dashboard. Type 'help' for commands, 'quit' to exit.".cyan()
    );
    session.print_page();

    loop {
        let prompt = session.format_prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if !matches!(line, "quit" | "exit" | "q") {
                    rl.add_history_entry(line)?;
                }

                debug!(command = %line, "Dashboard command");
                match session.execute(line) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        warn!(error = %e, "Dashboard command failed");
                        eprintln!("{}: {e}", "Error".red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e)).context("Readline failed");
            }
        }
    }

    rl.save_history(&session.history_path)?;
    info!("Ended dashboard session");
    println!("Goodbye!");
    Ok(())
}

impl DashboardSession {
    fn format_prompt(&self) -> String {
        let total = self.feed.total_pages();
        if total == 0 {
            "tweetlens> ".to_string()
        } else {
            format!("tweetlens [{}/{total}]> ", self.feed.current_page())
        }
    }

    fn execute(&mut self, input: &str) -> Result<bool> {
        let command = parse_command(input)?;
        match command {
            Command::Sort { key } => {
                self.feed.sort_by(key);
                println!("Sorted by {key}");
                self.print_page();
            }
            Command::Page { page } => {
                self.feed.go_to(page);
                self.print_page();
            }
            Command::Next => {
                self.feed.next_page();
                self.print_page();
            }
            Command::Prev => {
                self.feed.prev_page();
                self.print_page();
            }
            Command::First => {
                self.feed.first_page();
                self.print_page();
            }
            Command::Last => {
                self.feed.last_page();
                self.print_page();
            }
            Command::Show => self.print_page(),
            Command::Batches => self.print_batches()?,
            Command::Select { batches } => {
                self.insights.selected_batches = batches.into_iter().collect();
                self.refetch();
                self.print_page();
            }
            Command::Toggle { batch } => {
                self.insights.toggle_batch(batch);
                self.refetch();
                self.print_page();
            }
            Command::Chart { name } => {
                self.insights.toggle_series(&name);
                println!("Charts: {}", self.insights.selected_series.join(", "));
            }
            Command::Insights => self.print_insights(),
            Command::Ask { question } => self.run_ask(&question)?,
            Command::Help { command } => print_help(command.as_deref()),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    // The one store round trip: reload the mapped collection for the
    // current batch selection.
    fn refetch(&mut self) {
        let numbers = if self.insights.selected_batches.is_empty() {
            vec![1]
        } else {
            self.insights.batch_numbers()
        };
        let batch_size = self.config.batching.batch_size;
        let storage = &self.storage;
        let tweets = fetch_and_map(
            &numbers,
            batch_size,
            |offset, limit| storage.window(offset, limit),
            &Lexicon,
        );
        self.feed.replace(tweets);
    }

    fn print_page(&self) {
        if self.feed.is_empty() {
            println!("{}", "No tweets in the current selection.".dimmed());
            return;
        }

        println!();
        for tweet in self.feed.page_slice() {
            let sentiment = match tweet.sentiment {
                crate::model::Sentiment::Positive => "Positive".green(),
                crate::model::Sentiment::Neutral => "Neutral".dimmed(),
                crate::model::Sentiment::Negative => "Negative".red(),
            };
            println!(
                "{} {} {} [{sentiment}]",
                tweet.name.bold(),
                format!("@{}", tweet.username).dimmed(),
                tweet.display_time.dimmed(),
            );
            println!("  {}", truncate_text(&tweet.text, 100));
            println!(
                "  {} likes  {} retweets  {} replies  {} views",
                format_number(tweet.likes).cyan(),
                format_number(tweet.retweets).cyan(),
                format_number(tweet.replies).cyan(),
                format_number(tweet.views).cyan(),
            );
        }
        self.print_pager();
    }

    fn print_pager(&self) {
        let Some(pager) = self.feed.pager() else {
            return;
        };

        let mut strip = String::new();
        for item in &pager.items {
            match item {
                PageItem::Ellipsis => strip.push_str(" …"),
                PageItem::Page(p) if *p == pager.current_page => {
                    strip.push_str(&format!(" [{p}]"));
                }
                PageItem::Page(p) => strip.push_str(&format!(" {p}")),
            }
        }
        println!("\n  Page{strip}  ({} tweets)", self.feed.len());
    }

    fn print_batches(&self) -> Result<()> {
        let batches = batches_for(&self.storage, self.config.batching.batch_size)?;
        if batches.is_empty() {
            println!("{}", "No batches available.".dimmed());
            return Ok(());
        }

        println!("{}", "Batches".bold().cyan());
        for batch in &batches {
            let marker = if self.insights.selected_batches.contains(&batch.batch_number) {
                "*".green().to_string()
            } else {
                " ".to_string()
            };
            println!("  {marker} {}", batch.label);
        }
        println!("\n  (* = selected; 'toggle <n>' to change)");
        Ok(())
    }

    fn print_insights(&self) {
        let tweets = self.feed.tweets();
        let kpis = compute_kpis(tweets);

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

        for chart in selected_charts(tweets, &self.insights.selected_series) {
            print_chart(&chart);
        }
    }

    fn run_ask(&mut self, question: &str) -> Result<()> {
        let completion = CompletionClient::new(
            self.config.completion.endpoint.clone(),
            self.config.completion.model.clone(),
            self.config.api_key(),
        )?;
        let prompt = build_prompt(question, self.feed.tweets());

        println!("{}", "Thinking...".dimmed());
        let answer = self.runtime.block_on(completion.complete(&prompt))?;
        println!("\n{answer}\n");
        Ok(())
    }
}

fn print_chart(chart: &ChartSeries) {
    println!("\n{}", chart.title.bold());
    for dataset in &chart.datasets {
        let peak = dataset.data.iter().copied().max().unwrap_or(0).max(1);
        println!("  {}", dataset.label.dimmed());
        for (label, value) in chart.labels.iter().zip(&dataset.data) {
            let width = usize::try_from(value * 30 / peak).unwrap_or(0);
            println!("    {label:<18} {} {value}", "█".repeat(width).cyan());
        }
    }
}

fn parse_command(input: &str) -> Result<Command> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.is_empty() {
        anyhow::bail!("Empty command");
    }

    match parts[0] {
        "sort" | "s" => {
            let key = parts
                .get(1)
                .context("Usage: sort <latest|replies|retweets|likes|views>")?;
            let key = match key.to_lowercase().as_str() {
                "latest" => SortKey::Latest,
                "replies" => SortKey::Replies,
                "retweets" => SortKey::Retweets,
                "likes" => SortKey::Likes,
                "views" => SortKey::Views,
                other => anyhow::bail!("Unknown sort key: {other}"),
            };
            Ok(Command::Sort { key })
        }
        "page" | "p" => {
            let page = parts
                .get(1)
                .and_then(|p| p.parse().ok())
                .context("Usage: page <number>")?;
            Ok(Command::Page { page })
        }
        "next" | "n" => Ok(Command::Next),
        "prev" => Ok(Command::Prev),
        "first" => Ok(Command::First),
        "last" => Ok(Command::Last),
        "show" => Ok(Command::Show),
        "batches" | "b" => Ok(Command::Batches),
        "select" => {
            let batches: Vec<u32> = parts
                .get(1)
                .map(|s| s.split(',').filter_map(|t| t.trim().parse().ok()).collect())
                .unwrap_or_default();
            if batches.is_empty() {
                anyhow::bail!("Usage: select <n[,m,...]>");
            }
            Ok(Command::Select { batches })
        }
        "toggle" | "t" => {
            let batch = parts
                .get(1)
                .and_then(|p| p.parse().ok())
                .context("Usage: toggle <batch-number>")?;
            Ok(Command::Toggle { batch })
        }
        "chart" | "c" => {
            let name = parts[1..].join(" ");
            if name.is_empty() {
                anyhow::bail!("Usage: chart <name>");
            }
            Ok(Command::Chart { name })
        }
        "insights" | "i" => Ok(Command::Insights),
        "ask" | "a" => {
            let question = parts[1..].join(" ");
            if question.is_empty() {
                anyhow::bail!("Prompt is required.");
            }
            Ok(Command::Ask { question })
        }
        "help" | "h" | "?" => Ok(Command::Help {
            command: parts.get(1).map(ToString::to_string),
        }),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => anyhow::bail!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ),
    }
}

fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.replace('\n', " ").replace('\r', "");
    let char_count = text.chars().count();
    if char_count <= max_len {
        text
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

fn print_help(command: Option<&str>) {
    match command {
        Some("sort") => {
            println!("sort <key>      - re-sort the feed (latest, replies, retweets, likes, views)");
        }
        Some("select") => {
            println!("select <n,m>    - replace the batch selection and re-fetch");
        }
        Some("toggle") => {
            println!("toggle <n>      - toggle one batch in the selection and re-fetch");
        }
        Some("chart") => {
            println!("chart <name>    - toggle a chart (Engagement Metrics, Sentiment Analysis, Tweets Over Time)");
        }
        Some("ask") => {
            println!("ask <question>  - ask the model about the selected tweets");
        }
        _ => {
            println!("{}", "Commands:".bold().cyan());
            println!("  sort <key>      - re-sort the feed");
            println!("  page <n>        - jump to a page");
            println!("  next / prev     - move one page");
            println!("  first / last    - jump to the boundary pages");
            println!("  show            - reprint the current page");
            println!("  batches         - list available batches");
            println!("  select <n,m>    - replace the batch selection");
            println!("  toggle <n>      - toggle one batch");
            println!("  chart <name>    - toggle a chart");
            println!("  insights        - show KPIs and selected charts");
            println!("  ask <question>  - ask the model about the selection");
            println!("  help [command]  - show help");
            println!("  quit            - exit");
        }
    }
}
