//! End-to-end pipeline tests against a scripted translation backend

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_yaml::Value;
use yamlate_core::api::{ApiError, ApiResult, BatchRequest, TranslationBackend};
use yamlate_core::document::load_document;
use yamlate_core::pipeline::{run, RunConfig};

/// Backend that replays a scripted queue of responses, one per call.
struct MockBackend {
    responses: Mutex<VecDeque<ApiResult<String>>>,
    calls: AtomicUsize,
}

impl MockBackend {
    fn new(responses: Vec<ApiResult<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TranslationBackend for MockBackend {
    async fn translate_batch(&self, _request: &BatchRequest) -> ApiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::EmptyResponse))
    }
}

fn sample_document() -> Value {
    serde_yaml::from_str(
        r#"
messages:
  welcome: "Welcome"
  goodbye: "Goodbye"
  info: "Info"
  error: "Error"
title: "Title"
enabled: true
count: 3
"#,
    )
    .unwrap()
}

fn config(output: &std::path::Path, batch_size: usize) -> RunConfig {
    let mut config = RunConfig::new("Spanish", "gpt-4o-mini", output);
    config.batch_size = batch_size;
    config.max_retries = 3;
    config.timeout = Duration::from_secs(30);
    config
}

#[tokio::test(start_paused = true)]
async fn failed_batch_keeps_source_text_in_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("es_messages.yml");

    // Batch 2 of 3 exhausts its three attempts; the others succeed.
    let backend = MockBackend::new(vec![
        Ok("1. Bienvenido\n2. Adiós".into()),
        Err(ApiError::Transport("connection reset".into())),
        Err(ApiError::Transport("connection reset".into())),
        Err(ApiError::Transport("connection reset".into())),
        Ok("1. Título".into()),
    ]);

    let report = run(&backend, &sample_document(), &config(&output, 2))
        .await
        .unwrap();

    assert_eq!(report.total_translatable, 5);
    assert_eq!(report.items_translated, 3);
    assert_eq!(report.batches_total, 3);
    assert_eq!(report.batches_failed, vec![1]);
    assert!(report.succeeded());
    assert_eq!(backend.calls(), 5);

    let written = load_document(report.output_path.as_ref().unwrap()).unwrap();
    let messages = written.get("messages").unwrap();
    assert_eq!(
        messages.get("welcome").unwrap().as_str(),
        Some("Bienvenido")
    );
    assert_eq!(messages.get("goodbye").unwrap().as_str(), Some("Adiós"));
    // Failed batch falls back to the source text
    assert_eq!(messages.get("info").unwrap().as_str(), Some("Info"));
    assert_eq!(messages.get("error").unwrap().as_str(), Some("Error"));
    assert_eq!(written.get("title").unwrap().as_str(), Some("Título"));
    // Non-translatable leaves pass through untouched
    assert_eq!(written.get("enabled").unwrap().as_bool(), Some(true));
    assert_eq!(written.get("count").unwrap().as_i64(), Some(3));
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_within_a_batch() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.yml");

    let backend = MockBackend::new(vec![
        Err(ApiError::Timeout(30)),
        Err(ApiError::Status {
            status: 503,
            message: "unavailable".into(),
        }),
        Ok("1. Bienvenido\n2. Adiós\n3. Info\n4. Error\n5. Título".into()),
    ]);

    let report = run(&backend, &sample_document(), &config(&output, 50))
        .await
        .unwrap();

    assert_eq!(backend.calls(), 3);
    assert_eq!(report.items_translated, 5);
    assert!(report.batches_failed.is_empty());
    assert!(report.fallback_paths.is_empty());
}

#[tokio::test(start_paused = true)]
async fn short_response_falls_back_per_item() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.yml");

    let document: Value = serde_yaml::from_str(
        r#"
a: "one"
b: "two"
c: "three"
"#,
    )
    .unwrap();

    // Only two of three items come back
    let backend = MockBackend::new(vec![Ok("1. uno\n2. dos".into())]);

    let report = run(&backend, &document, &config(&output, 50))
        .await
        .unwrap();

    // The whole batch counts as translated even with fallbacks
    assert_eq!(report.items_translated, 3);
    assert_eq!(report.fallback_paths, vec!["c".to_string()]);

    let written = load_document(report.output_path.as_ref().unwrap()).unwrap();
    assert_eq!(written.get("a").unwrap().as_str(), Some("uno"));
    assert_eq!(written.get("b").unwrap().as_str(), Some("dos"));
    assert_eq!(written.get("c").unwrap().as_str(), Some("three"));
}

#[tokio::test(start_paused = true)]
async fn no_translatable_text_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.yml");

    let document: Value = serde_yaml::from_str(
        r#"
enabled: true
flag: "false"
blank: "   "
count: 12
"#,
    )
    .unwrap();

    let backend = MockBackend::new(vec![]);
    let report = run(&backend, &document, &config(&output, 50))
        .await
        .unwrap();

    assert_eq!(report.total_translatable, 0);
    assert_eq!(report.items_translated, 0);
    assert!(report.output_path.is_none());
    assert_eq!(backend.calls(), 0);
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn run_with_every_batch_failed_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.yml");

    let document: Value = serde_yaml::from_str(r#"greeting: "Hello""#).unwrap();
    let backend = MockBackend::new(vec![
        Err(ApiError::Timeout(30)),
        Err(ApiError::Timeout(30)),
        Err(ApiError::Timeout(30)),
    ]);

    let report = run(&backend, &document, &config(&output, 50))
        .await
        .unwrap();

    assert_eq!(backend.calls(), 3);
    assert_eq!(report.items_translated, 0);
    assert_eq!(report.batches_failed, vec![0]);
    assert!(!report.succeeded());
    assert!(report.output_path.is_none());
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn checkpoint_exists_after_each_successful_batch() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.yml");

    let document: Value = serde_yaml::from_str(
        r#"
a: "one"
b: "two"
"#,
    )
    .unwrap();

    // Batch size 1: first batch succeeds, second exhausts retries, so the
    // file on disk must hold the checkpoint from batch one plus the final
    // fallback snapshot.
    let backend = MockBackend::new(vec![
        Ok("1. uno".into()),
        Err(ApiError::Transport("reset".into())),
        Err(ApiError::Transport("reset".into())),
        Err(ApiError::Transport("reset".into())),
    ]);

    let report = run(&backend, &document, &config(&output, 1))
        .await
        .unwrap();

    assert_eq!(report.items_translated, 1);
    assert_eq!(report.batches_failed, vec![1]);

    let written = load_document(&output).unwrap();
    assert_eq!(written.get("a").unwrap().as_str(), Some("uno"));
    assert_eq!(written.get("b").unwrap().as_str(), Some("two"));
}
