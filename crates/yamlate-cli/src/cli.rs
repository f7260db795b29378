//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Yamlate CLI - YAML locale translation and small-caps styling
///
/// Translates the string leaves of YAML locale files through an LLM
/// provider in batches, with checkpointed progress, and converts text to
/// and from a Unicode small-caps display style while preserving
/// placeholders.
#[derive(Parser, Debug)]
#[command(
    name = "yamlate",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "YAMLATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate the string values of a YAML file to another language
    Translate(TranslateArgs),

    /// Convert string values to the Unicode small-caps style
    Smallcaps(StyleArgs),

    /// Convert small-caps styled values back to plain text
    Reverse(StyleArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Show or clear the translation run history
    History(HistoryArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the translate command
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Path to the YAML file to translate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Target language (e.g. "Spanish", "pt-BR")
    #[arg(short, long, value_name = "LANGUAGE")]
    pub language: String,

    /// Model ID to use for translation
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key for the provider (can also be set via environment)
    #[arg(long, env = "YAMLATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL override for the provider
    #[arg(long)]
    pub base_url: Option<String>,

    /// Number of texts per API request
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Maximum attempts per batch for failed requests
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output file path (defaults to a prefixed sibling of FILE)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the pre-run backup copy of FILE
    #[arg(long)]
    pub no_backup: bool,
}

/// Arguments shared by the smallcaps and reverse commands
#[derive(Parser, Debug)]
pub struct StyleArgs {
    /// Path to the YAML file to convert
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output file path (defaults to a prefixed sibling of FILE)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the result back over FILE instead of a new file
    #[arg(long, conflicts_with = "output")]
    pub in_place: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the current configuration values
    Show,

    /// Get a configuration value
    Get(ConfigGetArgs),

    /// Set a configuration value in the user config file
    Set(ConfigSetArgs),

    /// Print the configuration file path
    Path,
}

/// Arguments for config get
#[derive(Parser, Debug)]
pub struct ConfigGetArgs {
    /// Configuration key (e.g. api.model, files.auto_backup)
    pub key: String,
}

/// Arguments for config set
#[derive(Parser, Debug)]
pub struct ConfigSetArgs {
    /// Configuration key (e.g. api.model, files.auto_backup)
    pub key: String,

    /// New value
    pub value: String,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the history command
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

/// History actions
#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// Show recent translation runs, newest first
    Show(HistoryShowArgs),

    /// Delete the saved run history
    Clear,
}

/// Arguments for history show
#[derive(Parser, Debug)]
pub struct HistoryShowArgs {
    /// Maximum number of entries to display
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        use is_terminal::IsTerminal;
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_translate_args() {
        let cli = Cli::parse_from([
            "yamlate",
            "translate",
            "messages.yml",
            "--language",
            "Spanish",
            "--batch-size",
            "10",
        ]);
        match cli.command {
            Commands::Translate(args) => {
                assert_eq!(args.file, PathBuf::from("messages.yml"));
                assert_eq!(args.language, "Spanish");
                assert_eq!(args.batch_size, Some(10));
                assert!(!args.no_backup);
            }
            _ => panic!("expected translate command"),
        }
    }

    #[test]
    fn test_in_place_conflicts_with_output() {
        let result = Cli::try_parse_from([
            "yamlate",
            "smallcaps",
            "messages.yml",
            "--in-place",
            "--output",
            "out.yml",
        ]);
        assert!(result.is_err());
    }
}
