//! Precision-recall curves over aligned rows, optionally per label group.
//!
//! Curves are computed from the standard definition: walk distinct score
//! thresholds in descending order, accumulate true and false positives, and
//! emit one point per threshold with `precision = TP/(TP+FP)` and
//! `recall = TP/total positives`. The synthetic trailing point at recall 0
//! that curve libraries conventionally append is never emitted. Curves can
//! be compacted by dropping points whose precision and recall both moved
//! less than a resolution since the last kept point.

use std::collections::BTreeMap;

use crate::align::AlignedRow;

/// Default resolution for curve compaction: points within 1e-3 in both
/// precision and recall of the last kept point are dropped.
pub const DEFAULT_CURVE_RESOLUTION: f64 = 1e-3;

/// Group name used when no grouping is requested.
const UNGROUPED: &str = "all";

/// How to partition aligned rows before computing curves.
pub enum Grouping {
    /// One curve over the entire input, tagged `"all"`.
    None,
    /// One curve per group, where each row's group is derived from its label.
    ByLabel(Box<dyn Fn(&str) -> String + Send + Sync>),
}

impl Grouping {
    /// Grouping by a total function from label to group key.
    pub fn by_label(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Grouping::ByLabel(Box::new(f))
    }
}

/// One point on a precision-recall curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    /// Group this point belongs to (`"all"` when ungrouped).
    pub group: String,
    /// TP / (TP + FP) at this threshold.
    pub precision: f64,
    /// TP / total positives at this threshold. NaN when the group has no
    /// positive ground truth.
    pub recall: f64,
    /// Score threshold this point was computed at.
    pub threshold: f64,
    /// 2PR / (P + R); NaN when P = R = 0.
    pub f1: f64,
}

/// Precision/recall/threshold triples at every distinct score, descending.
///
/// Tied scores are pooled into a single point. With zero positive labels the
/// recall division degenerates to NaN; that is preserved, not special-cased.
fn pr_curve_points(gt: &[bool], scores: &[f64]) -> Vec<(f64, f64, f64)> {
    debug_assert_eq!(gt.len(), scores.len());

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_pos = gt.iter().filter(|&&g| g).count() as f64;

    let mut points = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;

    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]] == threshold {
            if gt[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        let precision = tp as f64 / (tp + fp) as f64;
        let recall = tp as f64 / total_pos;
        points.push((precision, recall, threshold));
    }

    points
}

/// Drop curve points that moved less than `resolution` in both precision and
/// recall since the last kept point. The first point is always kept; the
/// operation is idempotent and never grows the curve.
pub fn filter_curve(points: &[CurvePoint], resolution: f64) -> Vec<CurvePoint> {
    let mut kept: Vec<CurvePoint> = Vec::new();
    let mut last: Option<(f64, f64)> = None;
    for point in points {
        let keep = match last {
            None => true,
            Some((p, r)) => {
                (point.precision - p).abs() >= resolution || (point.recall - r).abs() >= resolution
            }
        };
        if keep {
            last = Some((point.precision, point.recall));
            kept.push(point.clone());
        }
    }
    kept
}

fn group_curve(group: &str, gt: &[bool], scores: &[f64], filtered: bool) -> Vec<CurvePoint> {
    let points: Vec<CurvePoint> = pr_curve_points(gt, scores)
        .into_iter()
        .map(|(precision, recall, threshold)| CurvePoint {
            group: group.to_string(),
            precision,
            recall,
            threshold,
            f1: 2.0 * precision * recall / (precision + recall),
        })
        .collect();
    if filtered {
        filter_curve(&points, DEFAULT_CURVE_RESOLUTION)
    } else {
        points
    }
}

/// Build precision-recall curves from aligned rows.
///
/// With [`Grouping::None`] the whole input forms one `"all"` curve; with
/// [`Grouping::ByLabel`] every group present in the data gets its own curve.
/// Groups are emitted concatenated in sorted group-name order. `filtered`
/// applies [`filter_curve`] at [`DEFAULT_CURVE_RESOLUTION`].
pub fn build_pr_curves(rows: &[AlignedRow], grouping: &Grouping, filtered: bool) -> Vec<CurvePoint> {
    let mut groups: BTreeMap<String, (Vec<bool>, Vec<f64>)> = BTreeMap::new();
    match grouping {
        Grouping::None => {
            let entry = groups.entry(UNGROUPED.to_string()).or_default();
            for row in rows {
                entry.0.push(row.gt);
                entry.1.push(row.value);
            }
        }
        Grouping::ByLabel(f) => {
            for row in rows {
                let entry = groups.entry(f(&row.label)).or_default();
                entry.0.push(row.gt);
                entry.1.push(row.value);
            }
        }
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let groups: Vec<(String, (Vec<bool>, Vec<f64>))> = groups.into_iter().collect();
        groups
            .par_iter()
            .map(|(name, (gt, scores))| group_curve(name, gt, scores, filtered))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        groups
            .iter()
            .flat_map(|(name, (gt, scores))| group_curve(name, gt, scores, filtered))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, label: &str, value: f64, gt: bool) -> AlignedRow {
        AlignedRow {
            id: id.into(),
            label: label.into(),
            value,
            gt,
        }
    }

    #[test]
    fn known_curve_values() {
        // Descending walk over (0.9,T), (0.7,F), (0.5,T), (0.3,F):
        //   0.9: P=1,   R=0.5
        //   0.7: P=0.5, R=0.5
        //   0.5: P=2/3, R=1.0
        //   0.3: P=0.5, R=1.0
        let rows = vec![
            row("a", "A", 0.9, true),
            row("b", "A", 0.7, false),
            row("c", "A", 0.5, true),
            row("d", "A", 0.3, false),
        ];
        let curve = build_pr_curves(&rows, &Grouping::None, false);
        assert_eq!(curve.len(), 4);
        assert_eq!(curve[0].group, "all");
        assert!((curve[0].precision - 1.0).abs() < 1e-12);
        assert!((curve[0].recall - 0.5).abs() < 1e-12);
        assert!((curve[0].threshold - 0.9).abs() < 1e-12);
        assert!((curve[2].precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((curve[2].recall - 1.0).abs() < 1e-12);
        // F1 at the first point: 2 * 1 * 0.5 / 1.5
        assert!((curve[0].f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_synthetic_trailing_point() {
        let rows = vec![row("a", "A", 0.8, true)];
        let curve = build_pr_curves(&rows, &Grouping::None, false);
        // One distinct threshold, one point; no (P=1, R=0) anchor.
        assert_eq!(curve.len(), 1);
        assert!((curve[0].recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tied_scores_pool_into_one_point() {
        let rows = vec![
            row("a", "A", 0.5, true),
            row("b", "A", 0.5, false),
            row("c", "A", 0.2, true),
        ];
        let curve = build_pr_curves(&rows, &Grouping::None, false);
        assert_eq!(curve.len(), 2);
        assert!((curve[0].precision - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_positives_yields_nan_recall() {
        let rows = vec![row("a", "A", 0.6, false)];
        let curve = build_pr_curves(&rows, &Grouping::None, false);
        assert_eq!(curve.len(), 1);
        assert!(curve[0].recall.is_nan());
        assert!((curve[0].precision - 0.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_empty_curve() {
        assert!(build_pr_curves(&[], &Grouping::None, true).is_empty());
    }

    #[test]
    fn grouped_curves_tagged_and_sorted() {
        let rows = vec![
            row("a", "GO:1", 0.9, true),
            row("b", "EC:1", 0.8, false),
            row("c", "GO:2", 0.4, true),
            row("d", "EC:2", 0.7, true),
        ];
        let grouping = Grouping::by_label(|label| label.split(':').next().unwrap().to_string());
        let curve = build_pr_curves(&rows, &grouping, false);
        let groups: Vec<&str> = curve.iter().map(|p| p.group.as_str()).collect();
        // EC points first (sorted group order), then GO.
        assert!(groups.starts_with(&["EC", "EC"]));
        assert!(groups.ends_with(&["GO", "GO"]));
        // Each group's curve only saw its own rows.
        let ec_last = curve.iter().filter(|p| p.group == "EC").last().unwrap();
        assert!((ec_last.recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn filter_drops_imperceptible_steps() {
        let mk = |p: f64, r: f64| CurvePoint {
            group: "all".into(),
            precision: p,
            recall: r,
            threshold: 0.5,
            f1: 2.0 * p * r / (p + r),
        };
        let points = vec![
            mk(1.0, 0.1),
            mk(1.0 - 1e-5, 0.1 + 1e-5),
            mk(0.9, 0.2),
        ];
        let filtered = filter_curve(&points, DEFAULT_CURVE_RESOLUTION);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0], points[0]);
        assert_eq!(filtered[1], points[2]);
    }

    #[test]
    fn filter_keeps_step_in_recall_only() {
        let mk = |p: f64, r: f64| CurvePoint {
            group: "all".into(),
            precision: p,
            recall: r,
            threshold: 0.5,
            f1: 0.0,
        };
        let points = vec![mk(0.8, 0.1), mk(0.8, 0.5)];
        assert_eq!(filter_curve(&points, 1e-3).len(), 2);
    }
}
