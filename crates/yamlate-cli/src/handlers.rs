//! Command handlers for the CLI
//!
//! Each handler owns one subcommand end to end: argument/config
//! resolution, calling into yamlate-core, and formatting the result.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::CommandFactory;

use crate::cli::{
    Cli, CompletionsArgs, ConfigAction, ConfigArgs, ConfigGetArgs, ConfigInitArgs, ConfigSetArgs,
    HistoryAction, HistoryArgs, StyleArgs, TranslateArgs,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::history::{self, HistoryEntry};
use crate::output::OutputWriter;

use yamlate_core::document::{load_document, write_document};
use yamlate_core::pipeline::{run, RunConfig};
use yamlate_core::smallcaps::{transform_document, Direction};
use yamlate_core::{ClientConfig, OpenAiClient};

/// Handle the translate command
pub async fn handle_translate(
    args: TranslateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    if !args.file.exists() {
        return Err(Error::FileNotFound { path: args.file });
    }

    let api_key = args
        .api_key
        .or_else(|| config.api.api_key.clone())
        .ok_or(Error::ApiKeyMissing)?;

    if config.files.auto_backup && !args.no_backup {
        match backup(&args.file) {
            Ok(path) => tracing::info!("backed up input to {}", path.display()),
            Err(e) => output.warn(&format!("could not back up input file: {}", e)),
        }
    }

    let document = load_document(&args.file)?;

    let output_path = args
        .output
        .unwrap_or_else(|| prefixed_path(&args.file, &config.files.output_prefix));
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.api.timeout_secs));

    let mut run_config = RunConfig::new(
        &args.language,
        args.model.as_deref().unwrap_or(&config.api.model),
        &output_path,
    );
    run_config.batch_size = args.batch_size.unwrap_or(config.api.batch_size);
    run_config.max_retries = args.max_retries.unwrap_or(config.api.max_retries);
    run_config.timeout = timeout;
    run_config.cancel = Some(cancel_on_ctrl_c());

    let mut client_config = ClientConfig::new(api_key).with_timeout(timeout);
    if let Some(base_url) = args.base_url.or_else(|| config.api.base_url.clone()) {
        client_config = client_config.with_base_url(base_url);
    }
    let client = OpenAiClient::new(client_config)?;

    let spinner = if config.output.progress {
        output.spinner(&format!("Translating to {}...", args.language))
    } else {
        None
    };

    let report = run(&client, &document, &run_config).await?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    output.print_batch_table(&report.summary);
    output.print_run_summary(&report);

    if config.history.auto_save {
        history::record(
            HistoryEntry::from_report(&report, &args.file.to_string_lossy(), &args.language),
            config.history.max_entries,
        );
    }

    match &report.output_path {
        Some(path) => output.success(&format!("Wrote {}", path.display())),
        None if report.total_translatable == 0 => {
            output.status("Nothing to translate, no output written");
        }
        None => {}
    }

    if report.total_translatable > 0 && !report.succeeded() {
        return Err(Error::other("no texts were translated"));
    }
    Ok(())
}

/// Handle the smallcaps command
pub fn handle_smallcaps(
    args: StyleArgs,
    _config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    handle_style(args, Direction::Encode, "smallcaps_", "Styled", output)
}

/// Handle the reverse command
pub fn handle_reverse(args: StyleArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    handle_style(args, Direction::Decode, "reversed_", "Restored", output)
}

fn handle_style(
    args: StyleArgs,
    direction: Direction,
    prefix: &str,
    action: &str,
    output: &mut OutputWriter,
) -> Result<()> {
    if !args.file.exists() {
        return Err(Error::FileNotFound { path: args.file });
    }

    let document = load_document(&args.file)?;
    let (converted, stats) = transform_document(&document, direction);

    let output_path = if args.in_place {
        args.file.clone()
    } else {
        args.output
            .unwrap_or_else(|| prefixed_path(&args.file, prefix))
    };
    write_document(&output_path, &converted)?;

    output.print_transform_stats(&stats, action);
    output.success(&format!("Wrote {}", output_path.display()));
    Ok(())
}

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init) => handle_config_init(init, output),
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| Error::config(format!("failed to render config: {}", e)))?;
            print!("{}", rendered);
            Ok(())
        }
        ConfigAction::Get(get) => handle_config_get(get, config),
        ConfigAction::Set(set) => handle_config_set(set, output),
        ConfigAction::Path => {
            let path = Config::default_path()
                .ok_or_else(|| Error::config("no user config directory available"))?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_config_get(args: ConfigGetArgs, config: &Config) -> Result<()> {
    let tree = toml::Value::try_from(config)
        .map_err(|e| Error::config(format!("failed to render config: {}", e)))?;
    let value = lookup(&tree, &args.key)
        .ok_or_else(|| Error::config(format!("unknown key '{}'", args.key)))?;
    match value {
        toml::Value::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
    Ok(())
}

fn handle_config_set(args: ConfigSetArgs, output: &mut OutputWriter) -> Result<()> {
    let path = Config::default_path()
        .ok_or_else(|| Error::config("no user config directory available"))?;
    let current = if path.exists() {
        Config::from_file(&path)?
    } else {
        Config::default()
    };

    let mut tree = toml::Value::try_from(&current)
        .map_err(|e| Error::config(format!("failed to render config: {}", e)))?;
    let (section, field) = args
        .key
        .rsplit_once('.')
        .ok_or_else(|| Error::config(format!("unknown key '{}'", args.key)))?;
    let slot = lookup_mut(&mut tree, section)
        .and_then(|node| node.get_mut(field))
        .ok_or_else(|| Error::config(format!("unknown key '{}'", args.key)))?;
    *slot = coerce_value(&args.value);

    // Deserializing back validates the type of the new value
    let updated: Config = tree
        .try_into()
        .map_err(|e| Error::config(format!("invalid value for '{}': {}", args.key, e)))?;
    updated.save(&path)?;
    output.success(&format!("Set {} in {}", args.key, path.display()));
    Ok(())
}

fn lookup<'a>(tree: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(tree, |node, segment| node.get(segment))
}

fn lookup_mut<'a>(tree: &'a mut toml::Value, key: &str) -> Option<&'a mut toml::Value> {
    key.split('.')
        .try_fold(tree, |node, segment| node.get_mut(segment))
}

/// Parse a raw CLI value as bool or integer before falling back to string.
fn coerce_value(raw: &str) -> toml::Value {
    if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(n) = raw.parse::<i64>() {
        toml::Value::Integer(n)
    } else {
        toml::Value::String(raw.to_string())
    }
}

fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    let path = Config::default_path()
        .ok_or_else(|| Error::config("no user config directory available"))?;
    if path.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save(&path)?;
    output.success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}

/// Handle the history command
pub fn handle_history(
    args: HistoryArgs,
    _config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        HistoryAction::Show(show) => {
            let entries = history::load(show.limit);
            if entries.is_empty() {
                output.status("No translation runs recorded");
                return Ok(());
            }
            for entry in &entries {
                let when = chrono::DateTime::parse_from_rfc3339(&entry.timestamp)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|_| entry.timestamp.clone());
                output.status(&format!(
                    "{}  {} -> {}  {}/{} texts, {}/{} batches ok, {:.1}s  [{}]",
                    when,
                    entry.file,
                    entry.language,
                    entry.items_translated,
                    entry.total_items,
                    entry.batches_total - entry.batches_failed,
                    entry.batches_total,
                    entry.duration_secs,
                    entry.status
                ));
            }
            Ok(())
        }
        HistoryAction::Clear => {
            history::clear()?;
            output.success("History cleared");
            Ok(())
        }
    }
}

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(
        args.shell.to_clap_shell(),
        &mut command,
        "yamlate",
        &mut std::io::stdout(),
    );
    Ok(())
}

/// Sibling path with a filename prefix: `dir/messages.yml` becomes
/// `dir/<prefix>messages.yml`
fn prefixed_path(file: &Path, prefix: &str) -> PathBuf {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file.with_file_name(format!("{}{}", prefix, name))
}

fn backup(file: &Path) -> std::io::Result<PathBuf> {
    let backup_path = prefixed_path(file, "backup_");
    std::fs::copy(file, &backup_path)?;
    Ok(backup_path)
}

fn cancel_on_ctrl_c() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current batch");
            flag.store(true, Ordering::Relaxed);
        }
    });
    cancel
}
