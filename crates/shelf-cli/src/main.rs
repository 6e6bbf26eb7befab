//! Shelf CLI
//!
//! Command-line interface for shelf - a small book catalog.
//! Without a subcommand an interactive menu is started.

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_core::{Catalog, Config};

mod commands;
mod menu;
mod output;
mod prompt;

use menu::Menu;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "shelf - a small book catalog kept in one JSON file")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Menu,
    /// Add a book
    Add {
        title: String,
        author: String,
        /// Year published
        #[arg(allow_negative_numbers = true)]
        year: i32,
    },
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Show one book
    Show { id: u64 },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        id: u64,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Search books by field (case-insensitive substring)
    Search {
        /// Field to search: id, title, author, year or status
        field: String,
        query: String,
    },
    /// Change a book's status ("in stock" or "checked out")
    Status { id: u64, status: String },
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
        /// Configuration key (data_file, search_fields, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output);
    if let Err(ref e) = result {
        if let Some(hint) = recovery_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands don't need the catalog
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let mut catalog = Catalog::open(config).context("Failed to open catalog")?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            Menu::new(&mut catalog, stdin.lock(), io::stdout()).run()
        }
        Commands::Add {
            title,
            author,
            year,
        } => commands::book::add(&mut catalog, title, author, year, output),
        Commands::List => commands::book::list(&catalog, output),
        Commands::Show { id } => commands::book::show(&catalog, id, output),
        Commands::Delete { id, yes } => commands::book::delete(&mut catalog, id, yes, output),
        Commands::Search { field, query } => {
            commands::book::search(&catalog, field, query, output)
        }
        Commands::Status { id, status } => {
            commands::book::set_status(&mut catalog, id, status, output)
        }
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

/// Recovery suggestion for storage failures anywhere in the error chain
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        match cause.downcast_ref::<shelf_core::Error>() {
            Some(shelf_core::Error::Storage(e)) => e.recovery_suggestion(),
            _ => cause
                .downcast_ref::<shelf_core::StorageError>()
                .and_then(|e| e.recovery_suggestion()),
        }
    })
}

/// Initialize logging
///
/// Only initializes if SHELF_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_local_dir}/shelf/debug.log)
/// so log lines never mix with menu output.
fn init_logging(config: &Config) {
    // Only log if SHELF_LOG is set
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "shelf_core={},shelf_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
