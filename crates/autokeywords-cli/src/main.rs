//! Autokeywords CLI
//!
//! SEO keyword extraction for stored content items.

use anyhow::Result;
use autokeywords_core::error::exit_codes;
use autokeywords_core::{AutoKeywordsError, Config, Database};
use clap::Parser;

mod app;
mod commands;
mod output;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<AutoKeywordsError>()
            .map(AutoKeywordsError::exit_code)
            .unwrap_or(exit_codes::GENERAL_ERROR);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Open database (use AUTOKEYWORDS_DB env var if set, otherwise use default)
    let db_path = std::env::var("AUTOKEYWORDS_DB")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| Database::default_path());
    let db = Database::open(&db_path)?;
    db.initialize()?;

    init_tracing(cli.verbose || debug_log_enabled(&db));

    let config = Config::load()?;
    tracing::debug!("Database at {}", db_path.display());

    match cli.command {
        Commands::Config(args) => commands::config::run(args, &db, &config, cli.format).await,
        Commands::TestKey(args) => commands::test_key::run(args, &db, &config).await,
        Commands::Item(args) => commands::item::run(args, &db, cli.format).await,
        Commands::Generate(args) => {
            commands::generate::run(args, &db, &config, cli.format).await
        }
        Commands::Bulk(args) => commands::bulk::run(args, &db, &config, cli.format).await,
        Commands::Tags(args) => commands::tags::run(args, &db, cli.format).await,
        Commands::Models(args) => commands::models::run(args, &db, &config, cli.format).await,
        Commands::Status => commands::status::run(&db, &config, cli.format).await,
    }
}

fn debug_log_enabled(db: &Database) -> bool {
    db.load_settings().map(|s| s.debug_log).unwrap_or(false)
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}
