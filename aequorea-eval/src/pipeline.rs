//! End-to-end pipeline: shards → batches → normalization → tidy rows.

use std::path::{Path, PathBuf};

use aequorea_core::Result;

use crate::batch::{BatchIter, InferenceRecord, ShardRecords};
use crate::normalize::ConfidenceNormalizer;
use crate::tidy::{sparsify, PredictionRow};

/// Stream inference shards into one tidy, normalized prediction table.
///
/// Shards are read in the given order as one logical record stream, batched
/// `batch_size` records at a time, normalized per batch, and sparsified at
/// `floor`. Only one batch's dense matrix is alive at any point; each is
/// dropped before the next is read. `open` turns a shard path into a lazy
/// per-file record iterator and `progress` fires once per opened shard.
///
/// # Errors
///
/// Any shard open failure, record parse failure, or shape mismatch aborts
/// the whole run; partial results are not returned.
pub fn normalized_tidy_predictions<F, R, P, N>(
    shard_paths: Vec<PathBuf>,
    vocab: &[String],
    normalizer: &N,
    floor: f64,
    batch_size: usize,
    open: F,
    progress: P,
) -> Result<Vec<PredictionRow>>
where
    F: FnMut(&Path) -> Result<R>,
    R: Iterator<Item = Result<InferenceRecord>>,
    P: FnMut(&Path),
    N: ConfidenceNormalizer + ?Sized,
{
    let records = ShardRecords::new(shard_paths, open, progress);
    let batches = BatchIter::new(records, batch_size)?;

    let mut rows = Vec::new();
    for batch in batches {
        let batch = batch?;
        let normalized = normalizer.normalize(&batch.scores, vocab)?;
        rows.extend(sparsify(&batch.ids, &normalized, vocab, floor)?);
    }
    Ok(rows)
}
