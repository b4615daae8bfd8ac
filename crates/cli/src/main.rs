//! Synvia CLI - authenticated access to the Synvia Platform API
//!
//! User-facing output goes to stdout; logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod commands;
mod context;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use commands::Commands;
use context::CliContext;
use synvia_infra::config;
use tracing::{debug, error, Level};

#[derive(Debug, Parser)]
#[command(name = "synvia")]
#[command(about = "Synvia Platform API client")]
#[command(version)]
struct Cli {
    /// Logging level used when RUST_LOG is not set
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LogLevel,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (JSON or TOML); probed from the usual locations when omitted
    #[arg(short = 'c', long, global = true, env = "SYNVIA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.log_level.into(), cli.log_json) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env file loaded"),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("erro: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config)?;
    let ctx = CliContext::new(config, cli.command.route())?;

    let mut stdout = std::io::stdout();
    cli.command.execute(&ctx, &mut stdout).await
}

fn load_config(path: Option<PathBuf>) -> Result<synvia_domain::Config> {
    let Some(path) = path else {
        return config::load().context("failed to load configuration");
    };

    let mut config = config::load_from_file(Some(path)).context("failed to load configuration")?;
    config::apply_env_overrides(&mut config)?;
    config::validate(&config)?;
    Ok(config)
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
