//! Per-batch confidence normalization.
//!
//! Normalization runs once per batch, before sparsification. The pipeline
//! only requires the [`ConfidenceNormalizer`] contract: a stateless,
//! shape-preserving map from one score matrix to another. Two
//! implementations are provided: [`IdentityNormalizer`] (pass-through) and
//! [`HierarchyNormalizer`] (max-propagation up a label hierarchy, so a
//! parent's confidence is never below any of its descendants').

use std::collections::HashMap;

use aequorea_core::{AequoreaError, Result};

use crate::matrix::ScoreMatrix;

/// A stateless, shape-preserving adjustment of a batch's confidences.
pub trait ConfidenceNormalizer {
    /// Map raw confidences to normalized ones. The output matrix must have
    /// the same shape as the input.
    fn normalize(&self, scores: &ScoreMatrix, vocab: &[String]) -> Result<ScoreMatrix>;
}

/// Pass-through normalizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl ConfidenceNormalizer for IdentityNormalizer {
    fn normalize(&self, scores: &ScoreMatrix, _vocab: &[String]) -> Result<ScoreMatrix> {
        Ok(scores.clone())
    }
}

/// Hierarchy-consistency normalizer.
///
/// Built from a `label -> ancestors` map. For each example, every ancestor's
/// normalized confidence becomes the maximum of its own confidence and the
/// confidences of all labels that name it as an ancestor. Ancestors absent
/// from the run's vocabulary are ignored; they cannot be represented in the
/// matrix.
#[derive(Debug, Clone, Default)]
pub struct HierarchyNormalizer {
    ancestors: HashMap<String, Vec<String>>,
}

impl HierarchyNormalizer {
    /// Create a normalizer from a `label -> ancestors` map.
    pub fn new(ancestors: HashMap<String, Vec<String>>) -> Self {
        Self { ancestors }
    }
}

impl ConfidenceNormalizer for HierarchyNormalizer {
    fn normalize(&self, scores: &ScoreMatrix, vocab: &[String]) -> Result<ScoreMatrix> {
        let (n_rows, n_cols) = scores.shape();
        if vocab.len() != n_cols {
            return Err(AequoreaError::ShapeMismatch(format!(
                "vocabulary length {} does not match {n_cols} matrix columns",
                vocab.len()
            )));
        }

        let index: HashMap<&str, usize> = vocab
            .iter()
            .enumerate()
            .map(|(i, label)| (label.as_str(), i))
            .collect();

        // (source column, ancestor column) pairs, resolved once per batch.
        let mut lifts: Vec<(usize, usize)> = Vec::new();
        for (j, label) in vocab.iter().enumerate() {
            if let Some(ancestors) = self.ancestors.get(label) {
                for ancestor in ancestors {
                    if let Some(&k) = index.get(ancestor.as_str()) {
                        lifts.push((j, k));
                    }
                }
            }
        }

        let mut data = scores.as_slice().to_vec();
        for i in 0..n_rows {
            let base = i * n_cols;
            for &(j, k) in &lifts {
                let v = scores.as_slice()[base + j];
                if v > data[base + k] {
                    data[base + k] = v;
                }
            }
        }
        ScoreMatrix::from_flat(data, n_cols)
    }
}
