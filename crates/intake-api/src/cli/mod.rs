//! Command-line interface definition.

pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// WhatsApp intake assistant.
#[derive(Parser)]
#[command(name = "intake", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "intake.toml", env = "INTAKE_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook and operator HTTP server.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config and HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the effective configuration; secrets show only as set or unset.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn parses_serve_with_overrides() {
        let cli = Cli::try_parse_from(["intake", "-v", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn config_path_defaults_to_working_directory() {
        let cli = Cli::try_parse_from(["intake", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
        // INTAKE_CONFIG may be set in the environment running the tests.
        if std::env::var_os("INTAKE_CONFIG").is_none() {
            assert_eq!(cli.config, PathBuf::from("intake.toml"));
        }
    }
}
