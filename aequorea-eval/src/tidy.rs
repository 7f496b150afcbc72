//! Tidy (long-format) tables for predictions and ground truth.
//!
//! A tidy table holds one row per observed (example, label) pair instead of a
//! dense matrix. [`sparsify`] converts a per-batch [`ScoreMatrix`] into tidy
//! prediction rows, discarding entries at or below a floor threshold;
//! [`GroundTruthTable::tidy`] does the same for nested ground-truth
//! annotations.

use aequorea_core::{AequoreaError, Result, Summarizable};

use crate::matrix::ScoreMatrix;

/// Default sparsity floor: the minimum confidence ever usable to call a
/// positive downstream. This is a memory-control floor far beneath machine
/// noise, not a decision threshold; raising it trades sensitivity for RAM.
pub const DEFAULT_SPARSITY_FLOOR: f64 = 1e-20;

/// One tidy prediction row: `(up_id, label, value)` with `value` above the
/// sparsity floor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionRow {
    /// Example identifier.
    #[cfg_attr(feature = "serde", serde(rename = "up_id"))]
    pub id: String,
    /// Label identifier.
    pub label: String,
    /// Model confidence for this (example, label) pair.
    pub value: f64,
}

/// One tidy ground-truth row: `(up_id, label)` with `gt = true` implied.
/// Absence of a row means the pair is a true negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundTruthRow {
    /// Example identifier.
    #[cfg_attr(feature = "serde", serde(rename = "up_id"))]
    pub id: String,
    /// A label that truly applies to the example.
    pub label: String,
}

/// Convert a dense batch of confidences into tidy prediction rows.
///
/// Emits one row for every entry strictly greater than `floor`. Row order is
/// example order, then ascending vocabulary index within an example; a given
/// (example, label) pair is emitted at most once.
///
/// # Errors
///
/// Returns [`AequoreaError::ShapeMismatch`] if `ids` does not match the
/// matrix row count or `vocab` does not match the column count.
pub fn sparsify(
    ids: &[String],
    scores: &ScoreMatrix,
    vocab: &[String],
    floor: f64,
) -> Result<Vec<PredictionRow>> {
    let (n_rows, n_cols) = scores.shape();
    if ids.len() != n_rows {
        return Err(AequoreaError::ShapeMismatch(format!(
            "{} identifiers for {n_rows} matrix rows",
            ids.len()
        )));
    }
    if vocab.len() != n_cols {
        return Err(AequoreaError::ShapeMismatch(format!(
            "vocabulary length {} does not match {n_cols} matrix columns",
            vocab.len()
        )));
    }

    let mut rows = Vec::new();
    for (id, confidences) in ids.iter().zip((0..n_rows).map(|i| scores.row(i))) {
        for (label, &value) in vocab.iter().zip(confidences) {
            if value > floor {
                rows.push(PredictionRow {
                    id: id.clone(),
                    label: label.clone(),
                    value,
                });
            }
        }
    }
    Ok(rows)
}

/// One ground-truth record: an example and the labels that truly apply to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundTruthRecord {
    /// Example identifier.
    pub sequence_name: String,
    /// True labels for the example, already deduplicated by the producer.
    pub true_labels: Vec<String>,
}

/// Nested ground-truth annotations, one record per example.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundTruthTable {
    /// Records in input order.
    pub records: Vec<GroundTruthRecord>,
}

impl GroundTruthTable {
    /// Flatten into tidy rows, one per (example, true label) pair.
    ///
    /// Duplicate labels within a record yield duplicate rows; deduplication
    /// is the producer's responsibility.
    pub fn tidy(&self) -> Vec<GroundTruthRow> {
        let mut rows = Vec::new();
        for record in &self.records {
            for label in &record.true_labels {
                rows.push(GroundTruthRow {
                    id: record.sequence_name.clone(),
                    label: label.clone(),
                });
            }
        }
        rows
    }
}

impl Summarizable for GroundTruthTable {
    fn summary(&self) -> String {
        let annotations: usize = self.records.iter().map(|r| r.true_labels.len()).sum();
        format!(
            "GroundTruthTable: {} examples, {annotations} annotations",
            self.records.len()
        )
    }
}
