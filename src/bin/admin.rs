//! CLI administration tool for shortlink.
//!
//! Inspects links and maintains the database schema without going through
//! the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply pending migrations
//! cargo run --bin admin -- db migrate
//!
//! # List the most recent links
//! cargo run --bin admin -- links list --limit 50
//!
//! # Show one link with its latest visits
//! cargo run --bin admin -- links show 3f2a9c...
//! ```
//!
//! # Environment Variables
//!
//! `DATABASE_URL`, or `DB_USER` / `DB_PASSWORD` / `DB_ADDR` / `DB_NAME`,
//! exactly as for the server.

use shortlink::config::{load_database_url, mask_connection_string};
use shortlink::domain::repositories::MappingRepository;
use shortlink::error::RepositoryError;
use shortlink::infrastructure::persistence::PgMappingRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::postgres::PgPoolOptions;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List the most recently created links
    List {
        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Show a link and its latest visits
    Show {
        /// Short link token
        token: String,

        /// Maximum number of visits to show
        #[arg(short, long, default_value_t = 10)]
        visits: i64,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending schema migrations
    Migrate {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = load_database_url().context("Database is not configured")?;

    let repo = PgMappingRepository::new();
    repo.connect(&database_url, PgPoolOptions::new().max_connections(2))
        .await
        .with_context(|| {
            format!(
                "Failed to connect to {}",
                mask_connection_string(&database_url)
            )
        })?;

    let result = match cli.command {
        Commands::Links { action } => handle_links_action(action, &repo).await,
        Commands::Db { action } => handle_db_action(action, &repo).await,
    };

    repo.close().await;

    result
}

async fn handle_links_action(action: LinksAction, repo: &PgMappingRepository) -> Result<()> {
    match action {
        LinksAction::List { limit } => list_links(repo, limit).await,
        LinksAction::Show { token, visits } => show_link(repo, &token, visits).await,
    }
}

/// Lists recent links, newest first.
///
/// # Output Format
///
/// ```text
/// 🔗 Recent Links
///
///   ID    Token                             Visits  Created           Target
///   ───────────────────────────────────────────────────────────────────────────
///   2     9b1d...                           14      2025-01-16 14:20  https://example.com/page
/// ```
async fn list_links(repo: &PgMappingRepository, limit: i64) -> Result<()> {
    println!("{}", "🔗 Recent Links".bright_blue().bold());
    println!();

    let links = repo
        .list_recent(limit)
        .await
        .context("Failed to list links")?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<33} {:<7} {:<17} {}",
        "ID".bright_white().bold(),
        "Token".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<5} {:<33} {:<7} {:<17} {}",
            link.id.to_string().bright_black(),
            link.token.cyan(),
            link.visit_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Shows a single link with its most recent visits.
async fn show_link(repo: &PgMappingRepository, token: &str, visit_limit: i64) -> Result<()> {
    let link = match repo.lookup(token).await {
        Ok(link) => link,
        Err(RepositoryError::NotFound(_)) => {
            println!("{}", format!("❌ No link with token {token}").red());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to look up link"),
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  ID:      {}", link.id.to_string().bright_black());
    println!("  Token:   {}", link.token.cyan());
    println!("  Target:  {}", link.long_url);
    println!(
        "  Visits:  {}",
        link.visit_count.to_string().bright_green().bold()
    );
    println!(
        "  Created: {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    let visits = repo
        .recent_visits(link.id, visit_limit)
        .await
        .context("Failed to load visits")?;

    if visits.is_empty() {
        println!("{}", "  No visits recorded".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<20} {:<40} {}",
        "Time".bright_white().bold(),
        "Address".bright_white().bold(),
        "Device".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for visit in &visits {
        println!(
            "  {:<20} {:<40} {}",
            visit
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            visit.source_address,
            visit.device_type.as_deref().unwrap_or("-")
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, repo: &PgMappingRepository) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            if !repo.health_check().await {
                anyhow::bail!("Database did not answer SELECT 1");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Apply pending migrations?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            repo.migrate().await.context("Migration failed")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
