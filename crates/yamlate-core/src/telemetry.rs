//! Per-batch timing telemetry for translation runs
//!
//! Bookkeeping only: the pipeline stamps batch lifecycle points
//! (queued, API call, file write, finished) and this module derives
//! elapsed/throughput figures for progress reporting. Absent timestamps
//! yield `None` durations, never zero; a zero-length run reports an
//! undefined throughput rather than dividing by zero.

use std::time::{Duration, Instant};

/// Lifecycle state of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Pending,
    Running,
    Completed,
}

/// Timestamps recorded for one batch. All optional: a failed batch never
/// receives its later stamps.
#[derive(Debug, Clone, Copy)]
struct BatchTiming {
    queued: Option<Instant>,
    api_start: Option<Instant>,
    api_end: Option<Instant>,
    file_start: Option<Instant>,
    file_end: Option<Instant>,
    finished: Option<Instant>,
    status: BatchStatus,
}

impl BatchTiming {
    fn new() -> Self {
        Self {
            queued: None,
            api_start: None,
            api_end: None,
            file_start: None,
            file_end: None,
            finished: None,
            status: BatchStatus::Pending,
        }
    }
}

/// Timing records for every batch in a run, keyed by batch index.
#[derive(Debug)]
pub struct BatchTelemetry {
    batches: Vec<BatchTiming>,
}

impl BatchTelemetry {
    pub fn new(total_batches: usize) -> Self {
        Self {
            batches: vec![BatchTiming::new(); total_batches],
        }
    }

    pub fn total_batches(&self) -> usize {
        self.batches.len()
    }

    /// Records are frozen once completed.
    fn stamp(&mut self, index: usize, f: impl FnOnce(&mut BatchTiming)) {
        if let Some(batch) = self.batches.get_mut(index) {
            if batch.status != BatchStatus::Completed {
                f(batch);
            }
        }
    }

    pub fn start_batch(&mut self, index: usize) {
        self.stamp(index, |b| {
            b.queued = Some(Instant::now());
            b.status = BatchStatus::Running;
        });
    }

    pub fn start_api(&mut self, index: usize) {
        self.stamp(index, |b| b.api_start = Some(Instant::now()));
    }

    pub fn end_api(&mut self, index: usize) {
        self.stamp(index, |b| b.api_end = Some(Instant::now()));
    }

    pub fn start_file(&mut self, index: usize) {
        self.stamp(index, |b| b.file_start = Some(Instant::now()));
    }

    pub fn end_file(&mut self, index: usize) {
        self.stamp(index, |b| b.file_end = Some(Instant::now()));
    }

    pub fn finish_batch(&mut self, index: usize) {
        self.stamp(index, |b| {
            b.finished = Some(Instant::now());
            b.status = BatchStatus::Completed;
        });
    }

    pub fn status(&self, index: usize) -> BatchStatus {
        self.batches
            .get(index)
            .map(|b| b.status)
            .unwrap_or(BatchStatus::Pending)
    }

    /// Whole-batch wall time, if the batch both started and finished.
    pub fn batch_time(&self, index: usize) -> Option<Duration> {
        let b = self.batches.get(index)?;
        Some(b.finished? - b.queued?)
    }

    /// Time spent inside the external API call, including retries.
    pub fn api_time(&self, index: usize) -> Option<Duration> {
        let b = self.batches.get(index)?;
        Some(b.api_end? - b.api_start?)
    }

    /// Time spent persisting the checkpoint file.
    pub fn file_time(&self, index: usize) -> Option<Duration> {
        let b = self.batches.get(index)?;
        Some(b.file_end? - b.file_start?)
    }

    pub fn completed_batches(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.status == BatchStatus::Completed)
            .count()
    }

    /// Per-batch status lines for progress display.
    pub fn batch_summaries(&self) -> Vec<BatchSummary> {
        (0..self.batches.len())
            .map(|i| BatchSummary {
                index: i,
                status: self.status(i),
                batch_time: self.batch_time(i),
                api_time: self.api_time(i),
                file_time: self.file_time(i),
            })
            .collect()
    }

    /// Aggregate breakdown of a finished run.
    pub fn summary(
        &self,
        run_started: Instant,
        total_items: usize,
        translated_items: usize,
    ) -> RunSummary {
        let total_elapsed = run_started.elapsed();
        let api_time: Duration = (0..self.batches.len()).filter_map(|i| self.api_time(i)).sum();
        let file_time: Duration = (0..self.batches.len())
            .filter_map(|i| self.file_time(i))
            .sum();
        let processing_time = total_elapsed.saturating_sub(api_time + file_time);
        let items_per_sec = if total_elapsed.is_zero() {
            None
        } else {
            Some(translated_items as f64 / total_elapsed.as_secs_f64())
        };
        RunSummary {
            total_elapsed,
            api_time,
            file_time,
            processing_time,
            api_pct: percentage(api_time, total_elapsed),
            file_pct: percentage(file_time, total_elapsed),
            processing_pct: percentage(processing_time, total_elapsed),
            items_per_sec,
            total_items,
            translated_items,
            completed_batches: self.completed_batches(),
            total_batches: self.batches.len(),
            batches: self.batch_summaries(),
        }
    }
}

fn percentage(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.as_secs_f64() / total.as_secs_f64() * 100.0
    }
}

/// Status line data for one batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    pub index: usize,
    pub status: BatchStatus,
    pub batch_time: Option<Duration>,
    pub api_time: Option<Duration>,
    pub file_time: Option<Duration>,
}

/// Final timing breakdown for a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_elapsed: Duration,
    pub api_time: Duration,
    pub file_time: Duration,
    pub processing_time: Duration,
    pub api_pct: f64,
    pub file_pct: f64,
    pub processing_pct: f64,
    /// Undefined (not zero) when the run took no measurable time.
    pub items_per_sec: Option<f64>,
    pub total_items: usize,
    pub translated_items: usize,
    pub completed_batches: usize,
    pub total_batches: usize,
    pub batches: Vec<BatchSummary>,
}

/// Human-readable duration: `850ms`, `2.3s`, `4m 12s`, `1h 5m`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        format!("{}m {}s", duration.as_secs() / 60, duration.as_secs() % 60)
    } else {
        format!(
            "{}h {}m",
            duration.as_secs() / 3600,
            (duration.as_secs() % 3600) / 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let telemetry = BatchTelemetry::new(3);
        assert_eq!(telemetry.total_batches(), 3);
        assert_eq!(telemetry.status(0), BatchStatus::Pending);
        assert_eq!(telemetry.completed_batches(), 0);
    }

    #[test]
    fn test_lifecycle_stamps() {
        let mut telemetry = BatchTelemetry::new(1);
        telemetry.start_batch(0);
        assert_eq!(telemetry.status(0), BatchStatus::Running);
        telemetry.start_api(0);
        telemetry.end_api(0);
        telemetry.start_file(0);
        telemetry.end_file(0);
        telemetry.finish_batch(0);
        assert_eq!(telemetry.status(0), BatchStatus::Completed);
        assert!(telemetry.batch_time(0).is_some());
        assert!(telemetry.api_time(0).is_some());
        assert!(telemetry.file_time(0).is_some());
    }

    #[test]
    fn test_absent_timestamps_yield_none() {
        let mut telemetry = BatchTelemetry::new(2);
        telemetry.start_batch(0);
        // Batch 0 never finished; batch 1 never started
        assert_eq!(telemetry.batch_time(0), None);
        assert_eq!(telemetry.api_time(0), None);
        assert_eq!(telemetry.batch_time(1), None);
    }

    #[test]
    fn test_completed_batches_are_frozen() {
        let mut telemetry = BatchTelemetry::new(1);
        telemetry.start_batch(0);
        telemetry.finish_batch(0);
        let finished = telemetry.batch_time(0);
        telemetry.start_api(0);
        assert_eq!(telemetry.api_time(0), None);
        assert_eq!(telemetry.batch_time(0), finished);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut telemetry = BatchTelemetry::new(1);
        telemetry.start_batch(5);
        assert_eq!(telemetry.status(5), BatchStatus::Pending);
    }

    #[test]
    fn test_summary_guards_zero_elapsed() {
        let telemetry = BatchTelemetry::new(0);
        let summary = telemetry.summary(Instant::now(), 0, 0);
        // Elapsed is effectively zero or tiny; throughput must never panic
        if summary.total_elapsed.is_zero() {
            assert!(summary.items_per_sec.is_none());
        }
        assert_eq!(summary.completed_batches, 0);
    }

    #[test]
    fn test_summary_accounts_time() {
        let mut telemetry = BatchTelemetry::new(1);
        let started = Instant::now();
        telemetry.start_batch(0);
        telemetry.start_api(0);
        std::thread::sleep(Duration::from_millis(5));
        telemetry.end_api(0);
        telemetry.finish_batch(0);
        let summary = telemetry.summary(started, 4, 4);
        assert!(summary.api_time >= Duration::from_millis(5));
        assert!(summary.total_elapsed >= summary.api_time);
        assert_eq!(summary.completed_batches, 1);
        assert!(summary.items_per_sec.is_some());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(2300)), "2.3s");
        assert_eq!(format_duration(Duration::from_secs(252)), "4m 12s");
        assert_eq!(format_duration(Duration::from_secs(3900)), "1h 5m");
    }
}
