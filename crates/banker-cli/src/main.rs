//! # banker-cli
//!
//! Command-line driver for the Banker's algorithm simulator.
//!
//! ## Usage
//!
//! ```bash
//! # Inspect the state loaded from max.txt / allocation.txt
//! banker status
//! banker check
//! banker enumerate --limit 10
//!
//! # Submit one request: process 1 asks for (1, 0, 2)
//! banker request 1 1 0 2
//!
//! # Menu loop over a live state
//! banker interactive
//!
//! # Configuration
//! banker config --show
//! banker config --set-total 10,5,7
//! ```

use banker_core::Units;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod loader;
mod output;
mod session;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Banker's algorithm simulator
#[derive(Parser, Debug)]
#[command(name = "banker")]
#[command(author, version, about, long_about = None)]
#[command(args_override_self = true)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path (defaults to ~/.banker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Max demand matrix file
    #[arg(long, global = true)]
    max: Option<PathBuf>,

    /// Allocation matrix file
    #[arg(long, global = true)]
    allocation: Option<PathBuf>,

    /// Total capacity per resource class (comma-separated, e.g. "10,5,7")
    #[arg(long, global = true, value_delimiter = ',')]
    total: Option<Vec<Units>>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the Max / Allocation / Need / Available table
    Status,
    /// Find one safe sequence for the current state
    Check,
    /// List every safe sequence
    Enumerate {
        /// Print at most this many sequences
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Submit one resource request
    Request {
        /// Requesting process id
        pid: usize,
        /// Units requested of each resource class
        #[arg(required = true, num_args = 1..)]
        units: Vec<Units>,
    },
    /// Menu loop reading commands from stdin
    Interactive,
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set total capacity per resource class
        #[arg(long, value_delimiter = ',')]
        set_total: Option<Vec<Units>>,
        /// Set max demand matrix file
        #[arg(long)]
        set_max: Option<PathBuf>,
        /// Set allocation matrix file
        #[arg(long)]
        set_allocation: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if cli.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    let json = cli.json;
    if let Err(e) = run(cli) {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Commands::Config {
        show,
        set_total,
        set_max,
        set_allocation,
    } = cli.command
    {
        return handle_config(
            &mut config,
            cli.config.as_deref(),
            show,
            set_total,
            set_max,
            set_allocation,
            cli.json,
        );
    }

    // Flags override the config file
    if let Some(max) = cli.max {
        config.max_path = max;
    }
    if let Some(allocation) = cli.allocation {
        config.allocation_path = allocation;
    }
    if let Some(total) = cli.total {
        config.total = total;
    }

    let mut state = loader::load_state(&config)?;

    match cli.command {
        Commands::Status => commands::status(&state, cli.json).print(),
        Commands::Check => commands::check(&state, cli.json).print(),
        Commands::Enumerate { limit } => {
            commands::enumerate(&state, limit.or(config.enumerate_limit), cli.json).print()
        }
        Commands::Request { pid, units } => {
            commands::request(&mut state, pid, &units, cli.json).print()
        }
        Commands::Interactive => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            session::Session::new(state, cli.json, config.enumerate_limit)
                .run(stdin.lock(), stdout.lock())?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    show: bool,
    set_total: Option<Vec<Units>>,
    set_max: Option<PathBuf>,
    set_allocation: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(total) = set_total {
        config.total = total;
        modified = true;
    }

    if let Some(max) = set_max {
        config.max_path = max;
        modified = true;
    }

    if let Some(allocation) = set_allocation {
        config.allocation_path = allocation;
        modified = true;
    }

    if modified {
        let written = config.save(path)?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &written.display().to_string())
            .message(&format!("Configuration saved to {}", written.display()))
            .print();
    } else if show {
        Output::new(json)
            .field_value("total", serde_json::json!(config.total))
            .field("max_path", &config.max_path.display().to_string())
            .field("allocation_path", &config.allocation_path.display().to_string())
            .field_value("enumerate_limit", serde_json::json!(config.enumerate_limit))
            .message(&format!(
                "Total: {:?}\nMax file: {}\nAllocation file: {}\nEnumerate limit: {}",
                config.total,
                config.max_path.display(),
                config.allocation_path.display(),
                config
                    .enumerate_limit
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-total/--set-max/--set-allocation to modify")
            .print();
    }

    Ok(())
}
