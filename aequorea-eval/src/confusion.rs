//! TP/FP/FN assignment at one fixed decision threshold.

use crate::align::AlignedRow;

/// An aligned row with confusion flags at a fixed threshold.
///
/// True negatives are implicit: `gt = false` with `value` at or below the
/// threshold leaves all three flags false.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfusionRow {
    /// Example identifier.
    #[cfg_attr(feature = "serde", serde(rename = "up_id"))]
    pub id: String,
    /// Label identifier.
    pub label: String,
    /// Prediction confidence.
    pub value: f64,
    /// Whether the label truly applies.
    pub gt: bool,
    /// True positive: `gt && value > threshold`.
    pub tp: bool,
    /// False positive: `!gt && value > threshold`.
    pub fp: bool,
    /// False negative: `gt && value < threshold`.
    #[cfg_attr(feature = "serde", serde(rename = "fn"))]
    pub fn_: bool,
}

/// Classify each aligned row as TP, FP, FN, or none of the three.
///
/// Both comparisons are strict, so a row with `value` exactly equal to the
/// threshold is counted in neither `tp` nor `fn`, whatever `gt` is. This
/// asymmetry is long-standing specified behavior and is kept as is.
pub fn assign_confusion(rows: &[AlignedRow], threshold: f64) -> Vec<ConfusionRow> {
    rows.iter()
        .map(|row| ConfusionRow {
            id: row.id.clone(),
            label: row.label.clone(),
            value: row.value,
            gt: row.gt,
            tp: row.gt && row.value > threshold,
            fp: !row.gt && row.value > threshold,
            fn_: row.gt && row.value < threshold,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value: f64, gt: bool) -> AlignedRow {
        AlignedRow {
            id: "seq1".into(),
            label: "A".into(),
            value,
            gt,
        }
    }

    #[test]
    fn basic_assignment() {
        let rows = vec![row(0.9, true), row(0.9, false), row(0.1, true), row(0.1, false)];
        let out = assign_confusion(&rows, 0.5);
        assert!(out[0].tp && !out[0].fp && !out[0].fn_);
        assert!(!out[1].tp && out[1].fp && !out[1].fn_);
        assert!(!out[2].tp && !out[2].fp && out[2].fn_);
        assert!(!out[3].tp && !out[3].fp && !out[3].fn_);
    }

    #[test]
    fn tie_at_threshold_excluded_from_tp_and_fn() {
        let out = assign_confusion(&[row(0.5, true), row(0.5, false)], 0.5);
        assert!(!out[0].tp && !out[0].fn_ && !out[0].fp);
        assert!(!out[1].tp && !out[1].fn_ && !out[1].fp);
    }

    #[test]
    fn carries_aligned_columns() {
        let out = assign_confusion(&[row(0.7, true)], 0.5);
        assert_eq!(out[0].id, "seq1");
        assert_eq!(out[0].label, "A");
        assert!((out[0].value - 0.7).abs() < 1e-12);
        assert!(out[0].gt);
    }
}
