//! Yamlate CLI - Command-line interface for YAML locale translation
//!
//! This is the main entry point for the Yamlate CLI application, providing
//! commands for translating YAML locale files through an LLM provider and
//! for applying or removing the small-caps display style.

mod cli;
mod config;
mod error;
mod handlers;
mod history;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use output::OutputWriter;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    if let Err(e) = logging::init_logging(cli.verbosity_level(), cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = run(cli).await;

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<()> {
    tracing::info!("Loading configuration");
    let config = Config::load_with_file(cli.config.as_deref())?;

    let mut output = OutputWriter::new(cli.use_color(), cli.quiet);

    tracing::info!(command = ?cli.command, "Executing command");

    match cli.command {
        Commands::Translate(args) => handlers::handle_translate(args, &config, &mut output).await,
        Commands::Smallcaps(args) => handlers::handle_smallcaps(args, &config, &mut output),
        Commands::Reverse(args) => handlers::handle_reverse(args, &config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::History(args) => handlers::handle_history(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}
