use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use runepost::config::Config;
use runepost::post::Error as PostError;
use runepost::publish::{publish, Draft};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

fn parse_date(arg: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .map_err(|e| format!("expected a date like 2025-11-06: {}", e))
}

/// Create a new post and link it from the index page, feed, and search index.
#[derive(Parser, Debug)]
#[command(about, version)]
struct Cli {
    /// Post title
    title: String,

    /// One-line summary for RSS and search (defaults to the title)
    #[arg(long)]
    summary: Option<String>,

    /// Comma-separated tags, e.g. 'rpg,design'
    #[arg(long)]
    tags: Option<String>,

    /// Override the publish date (YYYY-MM-DD; defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// The site root, or any directory beneath a `runepost.yaml`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Absolute URL post links in the feed are built on, e.g.
    /// https://jane.github.io
    #[arg(long)]
    base_url: Option<Url>,

    /// Log more (repeat for more still)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.title.trim().is_empty() {
        return Err(PostError::EmptyTitle.into());
    }

    let config = Config::from_directory(&cli.root, cli.base_url)?;
    let draft = Draft {
        title: &cli.title,
        date: cli.date.unwrap_or_else(|| Local::now().date_naive()),
        summary: cli.summary.as_deref(),
        tags: cli.tags.as_deref(),
    };

    let published = publish(&config, &draft)?;

    let file_name = |path: &PathBuf| {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    };
    println!("✅ Created {}", published.page_path.display());
    println!(
        "🔗 Linked on {} and {}",
        file_name(&config.index_file),
        file_name(&config.feed_file)
    );
    println!("🔎 Updated {}", file_name(&config.search_index_file));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
}
