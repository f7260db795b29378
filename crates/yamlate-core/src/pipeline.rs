//! Translation pipeline: the batched, resumable run over one document
//!
//! A run flattens the document, classifies leaves, partitions the
//! translatable ones into batches, and drives each batch sequentially
//! through the external service with retry and timeout. After every
//! successfully applied batch the current output projection is rebuilt and
//! written atomically, so a crash mid-run leaves the most recent completed
//! batch's output on disk and the file is loadable at any point.
//!
//! Batch failures are not fatal: the run continues, failed items keep
//! their source text, and the run as a whole succeeds if at least one
//! item was translated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_yaml::Value;

use crate::api::{execute_with_retry, ApiError, BatchRequest, RetryPolicy, TranslationBackend};
use crate::batch::{plan, Batch, BatchItem};
use crate::document::{flatten, unflatten, write_document, FlatEntry, KeyPath};
use crate::error::Result;
use crate::telemetry::{BatchTelemetry, RunSummary};

/// Configuration for one translation run, resolved once and passed in by
/// the caller. The pipeline holds no process-wide state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Language the leaf values are translated into.
    pub target_language: String,
    /// Provider model identifier.
    pub model: String,
    /// Maximum items per external-service call.
    pub batch_size: usize,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Total attempts per batch before it is marked failed.
    pub max_retries: u32,
    /// Where checkpoints and the final document are written.
    pub output_path: PathBuf,
    /// Cooperative stop, checked only between batches.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl RunConfig {
    pub fn new(
        target_language: impl Into<String>,
        model: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target_language: target_language.into(),
            model: model.into(),
            batch_size: 50,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            output_path: output_path.into(),
            cancel: None,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Outcome of a translation run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Items covered by successfully applied batches (fallbacks included).
    pub items_translated: usize,
    pub total_translatable: usize,
    pub batches_total: usize,
    /// Zero-based indexes of batches that exhausted their retries.
    pub batches_failed: Vec<usize>,
    /// Dotted paths of items that fell back to source text because the
    /// response came up short.
    pub fallback_paths: Vec<String>,
    pub summary: RunSummary,
    /// Set once anything was written to disk.
    pub output_path: Option<PathBuf>,
    /// Wall-clock start of the run, RFC 3339.
    pub started_at: String,
}

impl RunReport {
    /// A run succeeds when at least one item was translated.
    pub fn succeeded(&self) -> bool {
        self.items_translated > 0
    }
}

/// Drive a full translation run over an already-loaded document.
pub async fn run<B: TranslationBackend>(
    backend: &B,
    document: &Value,
    config: &RunConfig,
) -> Result<RunReport> {
    let run_started = Instant::now();
    let started_at = chrono::Utc::now().to_rfc3339();

    let entries = flatten(document);
    let mut output: HashMap<KeyPath, Value> = HashMap::new();
    let mut items = Vec::new();
    for entry in &entries {
        match translatable_text(&entry.value) {
            Some(text) => items.push(BatchItem {
                path: entry.path.clone(),
                text: text.to_string(),
            }),
            None => {
                output.insert(entry.path.clone(), entry.value.clone());
            }
        }
    }

    let total = items.len();
    tracing::info!(total, "queued translatable texts");
    if total == 0 {
        tracing::info!("no translatable text found");
        let telemetry = BatchTelemetry::new(0);
        return Ok(RunReport {
            items_translated: 0,
            total_translatable: 0,
            batches_total: 0,
            batches_failed: Vec::new(),
            fallback_paths: Vec::new(),
            summary: telemetry.summary(run_started, 0, 0),
            output_path: None,
            started_at,
        });
    }

    let batches = plan(items, config.batch_size)?;
    let mut telemetry = BatchTelemetry::new(batches.len());
    let instruction = system_instruction(&config.target_language);
    let policy = RetryPolicy::new(config.max_retries);

    let mut translated = 0;
    let mut failed = Vec::new();
    let mut fallbacks = Vec::new();
    let mut wrote_output = false;

    tracing::info!(batches = batches.len(), "starting translation");

    for batch in &batches {
        if config.cancelled() {
            tracing::warn!(batch = batch.index + 1, "run cancelled before batch");
            break;
        }

        telemetry.start_batch(batch.index);
        tracing::info!(
            batch = batch.index + 1,
            total_batches = batches.len(),
            items = batch.items.len(),
            "processing batch"
        );

        let request = BatchRequest {
            model: config.model.clone(),
            system_instruction: instruction.clone(),
            user_text: build_prompt(&batch.items),
        };

        telemetry.start_api(batch.index);
        let response = execute_with_retry(
            || async {
                match tokio::time::timeout(config.timeout, backend.translate_batch(&request)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::Timeout(config.timeout.as_secs())),
                }
            },
            policy.clone(),
        )
        .await;
        telemetry.end_api(batch.index);

        match response {
            Err(error) => {
                tracing::error!(batch = batch.index + 1, "batch failed, skipping: {}", error);
                failed.push(batch.index);
                // Failed items keep their source text in the final output
                for item in &batch.items {
                    output.insert(item.path.clone(), Value::String(item.text.clone()));
                }
            }
            Ok(text) => {
                let parsed = parse_numbered_response(&text);
                apply_batch(batch, &parsed, &mut output, &mut fallbacks);
                translated += batch.items.len();

                telemetry.start_file(batch.index);
                match persist(&entries, &output, &config.output_path) {
                    Ok(()) => wrote_output = true,
                    Err(error) => {
                        tracing::warn!(
                            batch = batch.index + 1,
                            "failed to write checkpoint: {}",
                            error
                        );
                    }
                }
                telemetry.end_file(batch.index);
                telemetry.finish_batch(batch.index);
                tracing::info!(translated, total, "progress saved");
            }
        }
    }

    // One more checkpoint so failed-batch source values reach the file
    if !failed.is_empty() && translated > 0 {
        match persist(&entries, &output, &config.output_path) {
            Ok(()) => wrote_output = true,
            Err(error) => tracing::warn!("failed to write final checkpoint: {}", error),
        }
    }

    let summary = telemetry.summary(run_started, total, translated);
    tracing::info!(
        translated,
        total,
        failed_batches = failed.len(),
        "translation finished"
    );

    Ok(RunReport {
        items_translated: translated,
        total_translatable: total,
        batches_total: batches.len(),
        batches_failed: failed,
        fallback_paths: fallbacks,
        summary,
        output_path: wrote_output.then(|| config.output_path.clone()),
        started_at,
    })
}

/// A leaf is translatable when it is a string that is not a boolean
/// literal and not blank.
fn translatable_text(value: &Value) -> Option<&str> {
    let text = value.as_str()?;
    if text.trim().is_empty() {
        return None;
    }
    let lowered = text.to_lowercase();
    if lowered == "true" || lowered == "false" {
        return None;
    }
    Some(text)
}

fn system_instruction(language: &str) -> String {
    format!(
        "Translate these texts to {language}. Keep ALL placeholders like \
         {{value}}, %placeholders%, &7 color codes, and <tags> EXACTLY as \
         they are. Return only the translated text in numbered format."
    )
}

fn build_prompt(items: &[BatchItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a numbered-list response into items.
///
/// A line whose head is decimal digits followed by `. ` is the next item
/// with the prefix stripped. A non-empty line without that shape is taken
/// verbatim, unless the untrimmed line merely looks numbered (a `1.`-`5.`
/// prefix with no separating space), in which case it is dropped rather
/// than guessed at; an indented such line counts as verbatim text.
pub(crate) fn parse_numbered_response(response: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in response.lines() {
        if let Some(rest) = strip_numeric_prefix(line) {
            items.push(rest.to_string());
            continue;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() && !has_digit_dot_prefix(line) {
            items.push(trimmed.to_string());
        }
    }
    items
}

fn strip_numeric_prefix(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

fn has_digit_dot_prefix(line: &str) -> bool {
    ["1.", "2.", "3.", "4.", "5."]
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Assign parsed values to the batch's paths in order; items beyond the
/// parsed count fall back to their source text with a warning.
fn apply_batch(
    batch: &Batch,
    parsed: &[String],
    output: &mut HashMap<KeyPath, Value>,
    fallbacks: &mut Vec<String>,
) {
    for (i, item) in batch.items.iter().enumerate() {
        let value = match parsed.get(i) {
            Some(text) => text.clone(),
            None => {
                tracing::warn!(path = %item.path, "missing translation, keeping source text");
                fallbacks.push(item.path.dotted());
                item.text.clone()
            }
        };
        output.insert(item.path.clone(), Value::String(value));
    }
}

/// Project the output map back onto the original leaf order and write the
/// rebuilt tree. Leaves not yet processed are left out, so the file is a
/// valid partial view at every checkpoint.
fn persist(
    entries: &[FlatEntry],
    output: &HashMap<KeyPath, Value>,
    path: &Path,
) -> Result<()> {
    let snapshot: Vec<FlatEntry> = entries
        .iter()
        .filter_map(|entry| {
            output.get(&entry.path).map(|value| FlatEntry {
                path: entry.path.clone(),
                value: value.clone(),
            })
        })
        .collect();
    write_document(path, &unflatten(&snapshot))
}
