//! Terminal output formatting for the CLI
//!
//! All user-facing output goes through [`OutputWriter`] so quiet mode and
//! color handling stay in one place. Diagnostics go to tracing, results
//! go here.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use yamlate_core::telemetry::{format_duration, BatchStatus, RunSummary};
use yamlate_core::{RunReport, TransformStats};

/// Writer for user-facing terminal output
pub struct OutputWriter {
    use_color: bool,
    quiet: bool,
}

impl OutputWriter {
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self { use_color, quiet }
    }

    /// Print an informational line (suppressed in quiet mode)
    pub fn status(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// Print a success line (suppressed in quiet mode)
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("✓ {}", message);
        }
    }

    /// Print a warning line to stderr (shown even in quiet mode)
    pub fn warn(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "Warning:".yellow().bold(), message);
        } else {
            eprintln!("Warning: {}", message);
        }
    }

    /// Start a spinner with a message, unless output is suppressed
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if self.quiet {
            return None;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(bar)
    }

    /// Print the per-batch timing table for a finished run
    pub fn print_batch_table(&self, summary: &RunSummary) {
        if self.quiet {
            return;
        }
        println!();
        println!("  {:<8} {:<10} {:>10} {:>10} {:>10}", "Batch", "Status", "Total", "API", "File");
        for batch in &summary.batches {
            // The table is printed after the run: a batch still marked
            // running never completed, and a pending one was never reached.
            let status = match batch.status {
                BatchStatus::Completed => self.paint_green("done"),
                BatchStatus::Running => self.paint_red("failed"),
                BatchStatus::Pending => "skipped".to_string(),
            };
            println!(
                "  {:<8} {:<10} {:>10} {:>10} {:>10}",
                batch.index + 1,
                status,
                batch.batch_time.map(format_duration).unwrap_or_else(|| "-".to_string()),
                batch.api_time.map(format_duration).unwrap_or_else(|| "-".to_string()),
                batch.file_time.map(format_duration).unwrap_or_else(|| "-".to_string()),
            );
        }
    }

    /// Print the final summary for a translation run
    pub fn print_run_summary(&self, report: &RunReport) {
        if self.quiet {
            return;
        }
        let summary = &report.summary;
        println!();
        println!(
            "Translated {} of {} texts in {} batches ({} failed)",
            report.items_translated,
            report.total_translatable,
            report.batches_total,
            report.batches_failed.len()
        );
        println!(
            "  Total time:      {}",
            format_duration(summary.total_elapsed)
        );
        println!(
            "  API time:        {} ({:.0}%)",
            format_duration(summary.api_time),
            summary.api_pct
        );
        println!(
            "  File time:       {} ({:.0}%)",
            format_duration(summary.file_time),
            summary.file_pct
        );
        println!(
            "  Processing time: {} ({:.0}%)",
            format_duration(summary.processing_time),
            summary.processing_pct
        );
        if let Some(rate) = summary.items_per_sec {
            println!("  Throughput:      {:.1} texts/sec", rate);
        }
        if !report.fallback_paths.is_empty() {
            self.warn(&format!(
                "{} texts kept their source value (incomplete API responses)",
                report.fallback_paths.len()
            ));
        }
    }

    /// Print the changed/total counts for a style conversion
    pub fn print_transform_stats(&self, stats: &TransformStats, action: &str) {
        self.success(&format!(
            "{} {} of {} text values",
            action, stats.changed, stats.total
        ));
    }

    fn paint_green(&self, text: &str) -> String {
        if self.use_color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_red(&self, text: &str) -> String {
        if self.use_color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}
