//! nestkv - An In-Memory Key-Integer Database with Nested Transactions
//!
//! This is the main entry point for the nestkv interpreter.
//! It reads command lines from stdin (or a script file), runs them against
//! a fresh transaction store, and prints the replies to stdout.

use anyhow::Context;
use nestkv::commands::CommandHandler;
use nestkv::session::{run_session, SessionEnd};
use nestkv::storage::{CountScope, StoreConfig};
use std::path::PathBuf;
use tokio::io::AsyncRead;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Interpreter configuration
#[derive(Debug, Default)]
struct Config {
    /// Script file to read commands from (stdin if unset)
    file: Option<PathBuf>,
    /// Counting scope for NUMEQUALTO
    count_scope: CountScope,
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--file" | "-f" => {
                    if i + 1 < args.len() {
                        config.file = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        eprintln!("Error: --file requires a value");
                        std::process::exit(1);
                    }
                }
                "--count-scope" => {
                    if i + 1 < args.len() {
                        config.count_scope = args[i + 1].parse().unwrap_or_else(|e| {
                            eprintln!("Error: {}", e);
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --count-scope requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("nestkv version {}", nestkv::VERSION);
                    std::process::exit(0);
                }
                path if !path.starts_with('-') && config.file.is_none() => {
                    config.file = Some(PathBuf::from(path));
                    i += 1;
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Returns the store configuration
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            count_scope: self.count_scope,
        }
    }
}

fn print_help() {
    println!(
        r#"
nestkv - An In-Memory Key-Integer Database with Nested Transactions

USAGE:
    nestkv [OPTIONS] [FILE]

OPTIONS:
    -f, --file <FILE>              Read commands from FILE instead of stdin
        --count-scope <SCOPE>      NUMEQUALTO scope: raw (default) or effective
    -v, --version                  Print version information
    -h, --help                     Print this help message

COMMANDS:
    SET key value    GET key    UNSET key    NUMEQUALTO value
    BEGIN            ROLLBACK   COMMIT       END

EXAMPLE:
    $ printf 'SET a 10\nBEGIN\nSET a 20\nGET a\nROLLBACK\nGET a\nEND\n' | nestkv
    20
    10

LOGGING:
    Diagnostics go to stderr; set RUST_LOG (e.g. RUST_LOG=debug) to see them.
"#
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging on stderr so stdout carries only replies
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    debug!(?config, "Configuration loaded");

    let input: Box<dyn AsyncRead + Unpin + Send> = match &config.file {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open script {}", path.display()))?;
            info!(path = %path.display(), "Reading commands from file");
            Box::new(file)
        }
        None => Box::new(tokio::io::stdin()),
    };

    let handler = CommandHandler::with_config(config.store_config());
    let (end, stats) = run_session(input, tokio::io::stdout(), handler)
        .await
        .context("session failed")?;

    match end {
        SessionEnd::Ended => debug!(commands = stats.commands_processed, "END received"),
        SessionEnd::Eof => debug!(commands = stats.commands_processed, "Input exhausted"),
    }

    Ok(())
}
