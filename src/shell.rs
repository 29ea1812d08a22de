//! Interactive shell
//!
//! A line-oriented prompt over the [`Indexer`] operations. Each line is
//! parsed into a [`ShellCommand`] and executed; command failures are printed
//! and the shell keeps going. The one-shot CLI subcommands run through the
//! same [`execute`] function.

use crate::crawler::{CrawlReport, CrawlRequest};
use crate::indexer::Indexer;
use crate::output::{format_crawl_report, format_documentation_entry, format_page_list};
use crate::IndexerError;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Prompt printed before each input line
pub const PROMPT: &str = ">>> ";

/// Text printed by `help`
pub const HELP_TEXT: &str = "\
Commands:
  crawl <name> <base_url> <prefix>  Crawl a site and save it under <name>
  list                              List indexed documentation
  pages <name>                      List the pages of a documentation
  read <name> <url>                 Fetch an indexed page and print it as text
  delete <name>                     Remove an indexed documentation
  help                              Show this help
  exit                              Leave the shell

Press Ctrl-C during a crawl to cancel it.";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Exit,
    List,
    Crawl {
        name: String,
        base_url: String,
        prefix: String,
    },
    Pages {
        name: String,
    },
    Read {
        name: String,
        url: String,
    },
    Delete {
        name: String,
    },
    /// Blank line
    Empty,
    /// Unrecognized command word
    Unknown(String),
}

/// Parses one line of shell input
///
/// The command word is case-insensitive; arguments are whitespace separated
/// and kept as typed.
///
/// # Returns
///
/// * `Ok(ShellCommand)` - The parsed command
/// * `Err(String)` - A usage message for a known command with the wrong
///   number of arguments
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(ShellCommand::Empty);
    };
    let args: Vec<String> = parts.map(str::to_string).collect();

    let command = word.to_ascii_lowercase();
    match command.as_str() {
        "help" | "?" => Ok(ShellCommand::Help),
        "exit" | "quit" => Ok(ShellCommand::Exit),
        "list" => expect_args(&args, 0, "list").map(|_| ShellCommand::List),
        "crawl" => expect_args(&args, 3, "crawl <name> <base_url> <prefix>").map(|args| {
            ShellCommand::Crawl {
                name: args[0].clone(),
                base_url: args[1].clone(),
                prefix: args[2].clone(),
            }
        }),
        "pages" => expect_args(&args, 1, "pages <name>").map(|args| ShellCommand::Pages {
            name: args[0].clone(),
        }),
        "read" => expect_args(&args, 2, "read <name> <url>").map(|args| ShellCommand::Read {
            name: args[0].clone(),
            url: args[1].clone(),
        }),
        "delete" => expect_args(&args, 1, "delete <name>").map(|args| ShellCommand::Delete {
            name: args[0].clone(),
        }),
        _ => Ok(ShellCommand::Unknown(word.to_string())),
    }
}

fn expect_args<'a>(args: &'a [String], count: usize, usage: &str) -> Result<&'a [String], String> {
    if args.len() == count {
        Ok(args)
    } else {
        Err(format!("Usage: {}", usage))
    }
}

/// Runs a command and returns the text to show the user
///
/// Crawls started here are cancelled by Ctrl-C.
pub async fn execute(indexer: &Indexer, command: &ShellCommand) -> Result<String, IndexerError> {
    match command {
        ShellCommand::Help => Ok(HELP_TEXT.to_string()),
        ShellCommand::Exit | ShellCommand::Empty => Ok(String::new()),
        ShellCommand::Unknown(word) => Ok(format!("Unknown command: {}\n{}", word, HELP_TEXT)),
        ShellCommand::List => {
            let names = indexer.list_documentations()?;
            if names.is_empty() {
                return Ok("No documentation indexed yet.".to_string());
            }
            let lines: Vec<String> = names
                .iter()
                .map(|name| format_documentation_entry(name, &indexer.documentation(name)))
                .collect();
            Ok(lines.join("\n"))
        }
        ShellCommand::Crawl {
            name,
            base_url,
            prefix,
        } => {
            let request = CrawlRequest::new(name, base_url, prefix);
            let report = crawl_interruptible(indexer, &request).await?;
            Ok(format_crawl_report(&report).trim_end().to_string())
        }
        ShellCommand::Pages { name } => {
            let pages = indexer.list_pages(name)?;
            Ok(format_page_list(&pages).trim_end().to_string())
        }
        ShellCommand::Read { name, url } => Ok(indexer.read_page(name, url).await?.render()),
        ShellCommand::Delete { name } => {
            indexer.delete(name)?;
            Ok(format!("Deleted documentation '{}'", name))
        }
    }
}

/// Runs a crawl that a Ctrl-C cancels
async fn crawl_interruptible(
    indexer: &Indexer,
    request: &CrawlRequest,
) -> Result<CrawlReport, IndexerError> {
    let cancel = CancellationToken::new();
    let crawl = indexer.crawl_with_cancellation(request, cancel.clone());
    tokio::pin!(crawl);

    tokio::select! {
        result = &mut crawl => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupt received, cancelling crawl of '{}'", request.name);
            cancel.cancel();
            crawl.await
        }
    }
}

/// Runs the interactive loop until `exit` or end of input
pub async fn run(indexer: &Indexer) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Docs indexer shell. Type 'help' for commands.");

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };

        if command == ShellCommand::Exit {
            break;
        }

        match execute(indexer, &command).await {
            Ok(text) if text.is_empty() => {}
            Ok(text) => println!("{}", text),
            Err(e) => println!("Error: {}", e),
        }
    }

    Ok(())
}
