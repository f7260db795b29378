//! Translation run history
//!
//! Completed runs are appended to a JSON file under the user data
//! directory, newest first, capped at a configured number of entries.
//! History is a convenience record: every failure here is logged and
//! swallowed so it can never fail a run that already succeeded.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use yamlate_core::RunReport;

/// One recorded translation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Run start time, RFC 3339
    pub timestamp: String,
    /// Input file as given on the command line
    pub file: String,
    /// Target language
    pub language: String,
    pub total_items: usize,
    pub items_translated: usize,
    pub batches_total: usize,
    pub batches_failed: usize,
    /// Total wall time in seconds
    pub duration_secs: f64,
    /// "ok", "partial" (some batches failed), or "failed"
    pub status: String,
}

impl HistoryEntry {
    pub fn from_report(report: &RunReport, file: &str, language: &str) -> Self {
        let status = if report.batches_failed.is_empty() {
            "ok"
        } else if report.succeeded() {
            "partial"
        } else {
            "failed"
        };
        Self {
            timestamp: report.started_at.clone(),
            file: file.to_string(),
            language: language.to_string(),
            total_items: report.total_translatable,
            items_translated: report.items_translated,
            batches_total: report.batches_total,
            batches_failed: report.batches_failed.len(),
            duration_secs: report.summary.total_elapsed.as_secs_f64(),
            status: status.to_string(),
        }
    }
}

/// Default history file path (`~/.local/share/yamlate/history.json`)
pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("yamlate").join("history.json"))
}

/// Record a run, trimming the file to `max_entries`. Never fails.
pub fn record(entry: HistoryEntry, max_entries: usize) {
    let Some(path) = default_path() else {
        tracing::debug!("no data directory, skipping history");
        return;
    };
    if let Err(e) = record_at(&path, entry, max_entries) {
        tracing::debug!("failed to record history: {}", e);
    }
}

fn record_at(
    path: &std::path::Path,
    entry: HistoryEntry,
    max_entries: usize,
) -> std::io::Result<()> {
    let mut entries = read_entries(path);
    entries.insert(0, entry);
    entries.truncate(max_entries);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&entries)?;
    std::fs::write(path, content)
}

/// Load up to `limit` entries, newest first. A missing or unreadable
/// file reads as empty.
pub fn load(limit: usize) -> Vec<HistoryEntry> {
    let Some(path) = default_path() else {
        return Vec::new();
    };
    let mut entries = read_entries(&path);
    entries.truncate(limit);
    entries
}

/// Delete the history file, if any
pub fn clear() -> std::io::Result<()> {
    if let Some(path) = default_path() {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
    }
    Ok(())
}

fn read_entries(path: &std::path::Path) -> Vec<HistoryEntry> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::debug!("unreadable history file, starting fresh: {}", e);
        Vec::new()
    })
}
