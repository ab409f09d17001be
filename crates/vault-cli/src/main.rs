//! Vault CLI
//!
//! Command-line interface for Vault - browse and edit notes stored on a
//! remote collection server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vault_core::Config;

mod commands;
mod console;
mod editor;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Vault - notes client for a remote collection server")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (default: ~/.config/vault/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Server address, overriding config and VAULT_BASE_URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List collections
    Collections,
    /// List documents in a collection
    #[command(alias = "ls")]
    List {
        /// Collection name
        collection: String,
    },
    /// Add a document to a collection
    Add {
        /// Collection name
        collection: String,
        /// Document title
        #[arg(short = 'T', long)]
        title: String,
        /// Document content (opens editor if not provided)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a document from a collection
    #[command(alias = "rm")]
    Delete {
        /// Collection name
        collection: String,
        /// Document ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, documents_route, field_names, collections, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work on the file itself, without CLI overrides
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    // TUI is the default when no command is given
    let Some(command) = cli.command else {
        return tui::run(config).await;
    };

    if !matches!(command, Commands::Tui) {
        init_cli_logging();
    }

    match command {
        Commands::Tui => tui::run(config).await,
        Commands::Collections => commands::collections::list(&config, &output).await,
        Commands::List { collection } => {
            commands::documents::list(&config, collection, &output).await
        }
        Commands::Add {
            collection,
            title,
            content,
        } => commands::documents::add(&config, collection, title, content, &output).await,
        Commands::Delete {
            collection,
            id,
            yes,
        } => commands::documents::delete(&config, collection, id, yes, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize stderr logging for one-shot commands
///
/// Only enabled when VAULT_LOG is set (e.g. VAULT_LOG=debug).
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("VAULT_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("vault_core={},vault_cli={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
