//! Outer join of tidy predictions with tidy ground truth.

use std::collections::HashMap;

use crate::tidy::{GroundTruthRow, PredictionRow};

/// One aligned row: the outer join of predictions and ground truth on
/// (example, label). A missing prediction has `value = 0.0`; a missing
/// ground-truth row has `gt = false`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignedRow {
    /// Example identifier.
    #[cfg_attr(feature = "serde", serde(rename = "up_id"))]
    pub id: String,
    /// Label identifier.
    pub label: String,
    /// Prediction confidence, 0.0 when only ground truth mentioned the pair.
    pub value: f64,
    /// Whether the label truly applies to the example.
    pub gt: bool,
}

/// Outer-join tidy predictions and ground truth on (example, label).
///
/// Every pair appearing in either input appears exactly once in the output.
/// Absent values are filled after the join: a pair only in the ground truth
/// gets `value = 0.0`, a pair only in the predictions gets `gt = false`. A
/// legitimately-zero prediction and an absent one therefore collapse to the
/// same sentinel; that simplification is deliberate. Output order is
/// prediction input order, then previously-unseen ground-truth pairs in
/// their input order.
pub fn align(predictions: &[PredictionRow], ground_truth: &[GroundTruthRow]) -> Vec<AlignedRow> {
    let mut rows: Vec<AlignedRow> = Vec::with_capacity(predictions.len());
    let mut index: HashMap<(String, String), usize> = HashMap::with_capacity(predictions.len());

    for p in predictions {
        let key = (p.id.clone(), p.label.clone());
        index.entry(key).or_insert_with(|| {
            rows.push(AlignedRow {
                id: p.id.clone(),
                label: p.label.clone(),
                value: p.value,
                gt: false,
            });
            rows.len() - 1
        });
    }

    for g in ground_truth {
        let key = (g.id.clone(), g.label.clone());
        match index.get(&key) {
            Some(&i) => rows[i].gt = true,
            None => {
                rows.push(AlignedRow {
                    id: g.id.clone(),
                    label: g.label.clone(),
                    value: 0.0,
                    gt: true,
                });
                index.insert(key, rows.len() - 1);
            }
        }
    }

    rows
}
