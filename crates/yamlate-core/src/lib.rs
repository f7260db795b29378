//! Yamlate core: batched LLM translation and small-caps styling for
//! YAML locale files
//!
//! The library is split along the run's phases:
//!
//! - [`document`] loads, flattens, rebuilds, and writes YAML documents
//! - [`batch`] partitions translatable leaves into fixed-size batches
//! - [`api`] is the external translation-service boundary (client, retry)
//! - [`pipeline`] drives a full translation run with checkpointing
//! - [`smallcaps`] encodes and decodes the Unicode small-caps style
//! - [`placeholder`] tokenizes text so placeholders survive both paths
//! - [`telemetry`] records per-batch timings for progress reporting
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use yamlate_core::document::load_document;
//! use yamlate_core::smallcaps::{transform_document, Direction};
//!
//! # fn main() -> yamlate_core::Result<()> {
//! let doc = load_document(Path::new("messages.yml"))?;
//! let (styled, stats) = transform_document(&doc, Direction::Encode);
//! println!("styled {} of {} leaves", stats.changed, stats.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod batch;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod placeholder;
pub mod smallcaps;
pub mod telemetry;

pub use api::{ApiError, ClientConfig, OpenAiClient, TranslationBackend};
pub use document::{load_document, write_document, KeyPath};
pub use error::{Error, Result};
pub use pipeline::{run, RunConfig, RunReport};
pub use smallcaps::{transform_document, Direction, TransformStats};
pub use telemetry::RunSummary;

/// Library version, taken from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
