//! CLI for the reconn auto-reconnect tools.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use reconn_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_probe, ProbeOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "reconn")]
#[command(about = "reconn: auto-reconnect policy tools for database clients", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/reconn/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Inspect or initialize the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Open a TCP connection to a server using the reconnect policy.
    Probe {
        /// Server address, e.g. db.example.com:3306.
        addr: String,
        /// Override reconnect.max_retries (a probe makes at most N+1 reconnects).
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
        /// Override dial.timeout_ms (0 disables the connect timeout).
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
        /// Log every reconnect attempt.
        #[arg(long)]
        debug: bool,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Print the effective configuration as TOML.
    Show,
    /// Write the default configuration.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let path = match cli.config {
            Some(path) => path,
            None => config::config_path()?,
        };

        match cli.command {
            CliCommand::Config { action } => run_config(&path, action)?,
            CliCommand::Probe {
                addr,
                max_retries,
                timeout_ms,
                debug,
            } => {
                let cfg = config::load_or_init_at(&path)?;
                tracing::debug!("loaded config: {:?}", cfg);
                let opts = ProbeOptions {
                    max_retries,
                    timeout_ms,
                    debug,
                };
                run_probe(&cfg, &addr, opts)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
