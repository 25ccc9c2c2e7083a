//! jira-mcp CLI - serve Jira read tools over MCP.

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jira_mcp_core::{FileConfig, TrackerConfig};
use jira_mcp_server::{available_tools, McpServer, TrackerCell};
use tracing_subscriber::EnvFilter;

/// Variable naming the env file loaded at startup.
const ENV_PATH_VAR: &str = "JIRA_MCP_ENV_PATH";
const DEFAULT_ENV_FILE: &str = "jira_mcp.env";

#[derive(Parser)]
#[command(name = "jira-mcp")]
#[command(author, version, about = "MCP server exposing Jira projects, issues and ticket summaries", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the MCP server on stdin/stdout (default)
    Serve,

    /// Print the tool registry as JSON
    Tools,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
enum ConfigCommands {
    /// Show the effective configuration with secrets masked
    Show,
}

/// Build the log filter: `-v` forces debug, otherwise `LOG_LEVEL`, then
/// `RUST_LOG`, then info.
fn log_filter(verbose: bool, log_level: Option<String>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }

    match log_level.filter(|level| !level.trim().is_empty()) {
        Some(level) => EnvFilter::new(level.trim().to_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Load `KEY=value` lines from `path` into the environment. Variables that
/// are already set keep their value. A missing file is only reported.
fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::info!("Loaded environment variables from {}", path.display());
            true
        }
        Err(e) if e.not_found() => {
            tracing::warn!(
                "Environment file {} not found. Using system environment variables.",
                path.display()
            );
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load environment file {}", path.display());
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, std::env::var("LOG_LEVEL").ok()))
        .with_writer(std::io::stderr)
        .init();

    let env_path = std::env::var(ENV_PATH_VAR).unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
    load_env_file(Path::new(&env_path));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let mut server = McpServer::new(TrackerCell::jira());
            server.run().await.context("MCP server failed")?;
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&available_tools())?);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let path = FileConfig::default_path()?;
                tracing::debug!("Default config file: {}", path.display());

                let config = TrackerConfig::from_env().context("Failed to resolve configuration")?;
                println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            }
        },
    }

    Ok(())
}
