//! `record-store` command line entry point.
//!
//! # Responsibility
//! - Run the sample users/posts/comments walkthrough against a store file.
//! - Offer a quick post search over an existing store.

mod demo;

use clap::{Parser, Subcommand};
use demo::run_demo;
use record_store_core::{core_version, init_logging_from_config, RecordStore, RepoResult, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "record-store", about = "SQLite users/posts/comments store")]
struct Cli {
    /// Store file; overrides RECORD_STORE_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files; overrides RECORD_STORE_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error; overrides RECORD_STORE_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert sample rows (skipped when already present), then print
    /// listings, search results and reports.
    Demo,
    /// Print posts whose title or content contains TERM.
    Search { term: String },
    /// Print the core crate version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging error: {err}");
        return ExitCode::FAILURE;
    }

    match cli.command {
        Command::Version => {
            println!("record_store_core version={}", core_version());
            ExitCode::SUCCESS
        }
        Command::Demo => run_with_store(&config, run_demo),
        Command::Search { term } => run_with_store(&config, |store| print_search(store, &term)),
    }
}

fn run_with_store<F>(config: &StoreConfig, body: F) -> ExitCode
where
    F: FnOnce(&mut RecordStore) -> RepoResult<()>,
{
    let mut store = match RecordStore::connect(config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error connecting to database: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("Connected to database: {}", config.db_path.display());

    let outcome = body(&mut store);
    let closed = store.close();

    match (outcome, closed) {
        (Ok(()), Ok(())) => ExitCode::SUCCESS,
        (Err(err), _) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
        (Ok(()), Err(err)) => {
            eprintln!("error closing database: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_search(store: &RecordStore, term: &str) -> RepoResult<()> {
    let hits = store.search_posts(term)?;
    println!("Found {} posts matching '{term}'", hits.len());
    for hit in &hits {
        println!("  - {} (by {})", hit.post.title, hit.username);
    }
    Ok(())
}
