//! Docs-Indexer main entry point
//!
//! This is the command-line interface for crawling, listing and reading
//! documentation sites.

use anyhow::Context;
use clap::{Parser, Subcommand};
use docs_indexer::config::{load_config_or_default, resolve_base_dir};
use docs_indexer::shell::{self, ShellCommand};
use docs_indexer::Indexer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Docs-Indexer: crawl, index and read documentation sites
///
/// Crawls a documentation site under a URL prefix, stores an index of its
/// pages, and fetches individual pages on demand as readable text.
#[derive(Parser, Debug)]
#[command(name = "docs-indexer")]
#[command(version)]
#[command(about = "Crawl, index and read documentation sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and save its index under NAME
    Crawl {
        name: String,
        base_url: String,
        /// Only URLs starting with this prefix are followed
        prefix: String,
    },

    /// List indexed documentation
    List,

    /// List the pages of an indexed documentation
    Pages { name: String },

    /// Fetch an indexed page and print it as text
    Read { name: String, url: String },

    /// Remove an indexed documentation
    Delete { name: String },

    /// Start the interactive shell
    Shell,
}

impl Command {
    fn into_shell_command(self) -> Option<ShellCommand> {
        match self {
            Self::Crawl {
                name,
                base_url,
                prefix,
            } => Some(ShellCommand::Crawl {
                name,
                base_url,
                prefix,
            }),
            Self::List => Some(ShellCommand::List),
            Self::Pages { name } => Some(ShellCommand::Pages { name }),
            Self::Read { name, url } => Some(ShellCommand::Read { name, url }),
            Self::Delete { name } => Some(ShellCommand::Delete { name }),
            Self::Shell => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    tracing::debug!("Store directory: {}", resolve_base_dir(&config)?.display());

    let indexer = Indexer::new(config).context("Failed to open the documentation store")?;

    match cli.command.into_shell_command() {
        Some(command) => {
            let text = shell::execute(&indexer, &command).await?;
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        None => shell::run(&indexer).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so page text on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_indexer=info,warn"),
            1 => EnvFilter::new("docs_indexer=debug,info"),
            2 => EnvFilter::new("docs_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
