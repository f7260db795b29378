//! Batch planning for the translation pipeline
//!
//! Pure, order-preserving partition of translatable leaves into
//! fixed-maximum-size batches. Deterministic: identical input always
//! produces identical batches.

use crate::document::KeyPath;
use crate::error::{Error, Result};

/// One translatable leaf queued for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub path: KeyPath,
    pub text: String,
}

/// An ordered group of items translated in one external-service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Zero-based position in the run.
    pub index: usize,
    pub items: Vec<BatchItem>,
}

/// Partition `items` into batches of at most `batch_size`, preserving
/// order. Produces `ceil(m / n)` batches; only the last may be short.
pub fn plan(items: Vec<BatchItem>, batch_size: usize) -> Result<Vec<Batch>> {
    if batch_size == 0 {
        return Err(Error::Validation {
            field: "batch_size".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size));
    let mut iter = items.into_iter().peekable();
    let mut index = 0;
    while iter.peek().is_some() {
        let chunk: Vec<BatchItem> = iter.by_ref().take(batch_size).collect();
        batches.push(Batch {
            index,
            items: chunk,
        });
        index += 1;
    }
    Ok(batches)
}
