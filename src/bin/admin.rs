//! CLI administration tool for tinylink.
//!
//! Provides commands for creating links, viewing statistics,
//! and performing database operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (reuses the existing code if the URL is known)
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Show statistics for one code
//! cargo run --bin admin -- stats Ab3xQ9z
//!
//! # Show totals
//! cargo run --bin admin -- summary
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`DATABASE_URL`, `DB_PATH`,
//! `BASE_URL`, `CODE_LENGTH`, ...). See [`tinylink::config`].

use tinylink::application::services::UrlService;
use tinylink::config::{self, Config};
use tinylink::domain::entities::UrlStats;
use tinylink::infrastructure::persistence::{SqliteUrlStore, database};
use tinylink::utils::code_generator::RandomCodeGenerator;
use tinylink::utils::url_validator::validate_http_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short URL
    Shorten {
        /// Absolute http(s) URL to shorten
        url: String,
    },

    /// Show click statistics for a short code
    Stats {
        /// Short code
        code: String,
    },

    /// Show link and click totals
    Summary,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;

    let pool = database::connect(&config.database_url, &config.pool_settings())
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Shorten { url } => handle_shorten(&config, &pool, &url).await?,
        Commands::Stats { code } => handle_stats(&pool, &code).await?,
        Commands::Summary => handle_summary(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

/// Shortens a URL through the same service the HTTP API uses.
async fn handle_shorten(config: &Config, pool: &SqlitePool, url: &str) -> Result<()> {
    validate_http_url(url).with_context(|| format!("Cannot shorten '{url}'"))?;

    database::run_migrations(pool)
        .await
        .context("Failed to run migrations")?;

    let store = Arc::new(SqliteUrlStore::new(Arc::new(pool.clone())));
    let generator = Arc::new(RandomCodeGenerator::new(config.code_length));
    // Never resolves codes, so the click queue only needs to exist.
    let (click_tx, _click_rx) = mpsc::channel(1);

    let service = UrlService::new(store, generator, click_tx, config.base_url.clone())
        .with_max_attempts(config.shorten_max_attempts);

    let outcome = service
        .shorten(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    if outcome.is_created() {
        println!("{}", "✅ Short URL created".green().bold());
    } else {
        println!("{}", "ℹ️  URL already shortened".yellow().bold());
    }
    println!();
    println!("  Original: {}", outcome.original_url.cyan());
    println!("  Code:     {}", outcome.short_code.bright_white().bold());
    println!("  Short:    {}", outcome.short_url.bright_yellow().bold());
    println!();

    Ok(())
}

/// Looks up statistics for one short code, failing if it is unknown.
async fn fetch_stats(pool: &SqlitePool, code: &str) -> Result<UrlStats> {
    use tinylink::domain::repositories::UrlStore;

    let store = SqliteUrlStore::new(Arc::new(pool.clone()));

    store
        .get_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("Short code '{code}' not found"))
}

/// Displays statistics for one short code.
async fn handle_stats(pool: &SqlitePool, code: &str) -> Result<()> {
    let stats = fetch_stats(pool, code).await?;

    println!("{}", "📊 Link Statistics".bright_blue().bold());
    println!();
    println!("  Code:     {}", stats.short_code.bright_white().bold());
    println!("  Original: {}", stats.original_url.cyan());
    println!(
        "  Clicks:   {}",
        stats.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created:  {}",
        stats
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Displays totals across all links.
///
/// Shows:
/// - Total number of links
/// - Total number of clicks
async fn handle_summary(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Summary".bright_blue().bold());
    println!();

    let (links_count, clicks_count): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(clicks), 0) FROM urls")
            .fetch_one(pool)
            .await
            .context("Failed to query totals")?;

    println!(
        "  Links:  {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  SQLite: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            database::run_migrations(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
