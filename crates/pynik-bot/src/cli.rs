//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use pynik_core::TracingConfig;

/// pynik - chat commands from the console
#[derive(Debug, Parser)]
#[command(name = "pynik")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "PYNIK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log JSON lines with timestamps, for running unattended
    #[arg(long)]
    pub json_logs: bool,

    /// Nick the lines are sent from
    #[arg(long, short, default_value = "console")]
    pub source: String,

    /// Channel the lines are sent to (defaults to the bot's nick)
    #[arg(long, short)]
    pub target: Option<String>,

    /// A single chat line to handle, e.g. `.schema y1a`; read stdin if absent
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub line: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the one-shot line, if one was given.
    pub fn one_shot_line(&self) -> Option<String> {
        if self.line.is_empty() {
            None
        } else {
            Some(self.line.join(" "))
        }
    }

    /// Picks the logging preset; `config_debug` is the config file's
    /// `debug` flag.
    pub fn tracing_config(&self, config_debug: bool) -> TracingConfig {
        let debug = self.debug || config_debug;
        match (self.json_logs, debug) {
            (true, true) => TracingConfig::service().with_level(Level::DEBUG),
            (true, false) => TracingConfig::service(),
            (false, true) => TracingConfig::debug(),
            (false, false) => TracingConfig::console(),
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration and data paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_line_joins_words() {
        let cli = Cli::parse_from(["pynik", "--source", "serp", ".schema", "y1a"]);
        assert_eq!(cli.source, "serp");
        assert_eq!(cli.one_shot_line().as_deref(), Some(".schema y1a"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn no_line_means_stdin() {
        let cli = Cli::parse_from(["pynik", "--debug"]);
        assert!(cli.debug);
        assert_eq!(cli.one_shot_line(), None);
        assert_eq!(cli.source, "console");
    }

    #[test]
    fn tracing_presets_follow_flags() {
        let cli = Cli::parse_from(["pynik"]);
        assert_eq!(cli.tracing_config(false), TracingConfig::console());
        assert_eq!(cli.tracing_config(true), TracingConfig::debug());

        let cli = Cli::parse_from(["pynik", "--json-logs"]);
        assert_eq!(cli.tracing_config(false), TracingConfig::service());

        let cli = Cli::parse_from(["pynik", "--json-logs", "--debug"]);
        let config = cli.tracing_config(false);
        assert_eq!(config.output_format, pynik_core::TracingOutputFormat::Json);
        assert_eq!(config.level, Level::DEBUG);
    }

    #[test]
    fn config_subcommand() {
        let cli = Cli::parse_from(["pynik", "config", "path"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
