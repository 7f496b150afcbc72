//! Memory-bounded evaluation of sparse multi-label predictions.
//!
//! Large multi-label classifiers (protein function prediction being the
//! motivating case) emit one confidence per example-label pair over a
//! vocabulary of thousands of labels, yet almost every confidence is
//! essentially zero. This crate evaluates such predictions against ground
//! truth without ever holding a dense examples × labels matrix for the whole
//! dataset: predictions are streamed in fixed-size batches, normalized,
//! sparsified into a long-format ("tidy") table, joined with tidy ground
//! truth, and scored.
//!
//! - **Batching** — [`BatchIter`], [`ShardRecords`]: group a lazy record
//!   stream (possibly spanning many shard files) into bounded batches
//! - **Sparsification** — [`sparsify`]: dense batch matrix → tidy rows above
//!   a tiny floor threshold
//! - **Normalization** — [`ConfidenceNormalizer`]: per-batch score adjustment,
//!   e.g. hierarchy max-propagation
//! - **Alignment** — [`align`]: outer join of predictions and ground truth
//! - **PR curves** — [`build_pr_curves`]: per-group precision-recall curves
//!   with near-duplicate point compaction
//! - **Confusion** — [`assign_confusion`]: TP/FP/FN flags at one threshold

pub mod align;
pub mod batch;
pub mod confusion;
pub mod curve;
pub mod matrix;
pub mod normalize;
pub mod pipeline;
pub mod tidy;

pub use align::{align, AlignedRow};
pub use batch::{Batch, BatchIter, InferenceRecord, ShardRecords};
pub use confusion::{assign_confusion, ConfusionRow};
pub use curve::{build_pr_curves, filter_curve, CurvePoint, Grouping, DEFAULT_CURVE_RESOLUTION};
pub use matrix::ScoreMatrix;
pub use normalize::{ConfidenceNormalizer, HierarchyNormalizer, IdentityNormalizer};
pub use pipeline::normalized_tidy_predictions;
pub use tidy::{
    sparsify, GroundTruthRecord, GroundTruthRow, GroundTruthTable, PredictionRow,
    DEFAULT_SPARSITY_FLOOR,
};
