//! Bookworm CLI - library catalog and borrowing desk
//!
//! A command-line front end for the Bookworm library API: browse books,
//! request borrowings, and (for administrators) run the approval desk.

mod commands;
mod output;

use std::sync::Arc;

use anyhow::Result;
use bookworm_core::{ClientConfig, LibraryClient};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookworm")]
#[command(author, version, about = "Bookworm library client", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override the API host (or set BOOKWORM_API_URL env var)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, register, log out and manage your password
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },

    /// Browse and manage the book catalog
    Books {
        #[command(subcommand)]
        action: commands::books::BooksAction,
    },

    /// Browse and manage authors
    Authors {
        #[command(subcommand)]
        action: commands::authors::AuthorsAction,
    },

    /// Browse and manage publishers
    Publishers {
        #[command(subcommand)]
        action: commands::publishers::PublishersAction,
    },

    /// Track and act on borrowing requests
    Borrowings {
        #[command(subcommand)]
        action: commands::borrowings::BorrowingsAction,
    },

    /// View and edit your profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },

    /// Recent books, people and borrowings at a glance
    Dashboard,

    /// Show client configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let loaded = ClientConfig::load()?.with_api_url(cli.api_url);
    log::debug!("[cli] API base URL: {}", loaded.config.base_url());

    let notifier = Arc::new(output::ConsoleNotifier::new(cli.quiet));
    let client = LibraryClient::new(&loaded.config, notifier)?;
    client.session().initialize().await;

    // Create context for commands
    let ctx = commands::Context {
        client,
        config: loaded,
        format: cli.format,
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Auth { action } => commands::auth::execute(&ctx, action).await,
        Commands::Books { action } => commands::books::execute(&ctx, action).await,
        Commands::Authors { action } => commands::authors::execute(&ctx, action).await,
        Commands::Publishers { action } => commands::publishers::execute(&ctx, action).await,
        Commands::Borrowings { action } => commands::borrowings::execute(&ctx, action).await,
        Commands::Profile { action } => commands::profile::execute(&ctx, action).await,
        Commands::Dashboard => commands::dashboard::execute(&ctx).await,
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    }
}
