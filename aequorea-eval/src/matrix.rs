//! Dense per-batch score matrix.
//!
//! [`ScoreMatrix`] stores a row-major dense matrix of `f64` confidences
//! (n_examples × n_labels). It only ever holds one batch at a time: batches
//! are sparsified into tidy rows and the matrix is dropped before the next
//! batch is read.

use aequorea_core::{AequoreaError, Result, Summarizable};

/// A dense, row-major confidence matrix (examples × labels).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    data: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
}

impl ScoreMatrix {
    /// Create a matrix by stacking per-example confidence vectors.
    ///
    /// Each inner `Vec` is one example's confidences over the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`AequoreaError::ShapeMismatch`] if the rows have unequal
    /// lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        let mut flat = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(AequoreaError::ShapeMismatch(format!(
                    "row {i} has {} values, expected {n_cols}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        Ok(Self {
            data: flat,
            n_rows,
            n_cols,
        })
    }

    /// Create a matrix from flat row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`AequoreaError::ShapeMismatch`] if the data length is not a
    /// multiple of `n_cols`, or [`AequoreaError::InvalidInput`] if `n_cols`
    /// is 0 with non-empty data.
    pub fn from_flat(data: Vec<f64>, n_cols: usize) -> Result<Self> {
        if n_cols == 0 {
            if !data.is_empty() {
                return Err(AequoreaError::InvalidInput(
                    "n_cols must be > 0 for non-empty data".into(),
                ));
            }
            return Ok(Self {
                data,
                n_rows: 0,
                n_cols: 0,
            });
        }
        if data.len() % n_cols != 0 {
            return Err(AequoreaError::ShapeMismatch(format!(
                "data length {} not divisible by n_cols {n_cols}",
                data.len()
            )));
        }
        let n_rows = data.len() / n_cols;
        Ok(Self {
            data,
            n_rows,
            n_cols,
        })
    }

    /// (n_rows, n_cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of example rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of label columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// One example's confidence vector.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// The entry at (row, col), or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.n_rows && col < self.n_cols {
            Some(self.data[row * self.n_cols + col])
        } else {
            None
        }
    }

    /// The underlying flat row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Summarizable for ScoreMatrix {
    fn summary(&self) -> String {
        format!(
            "ScoreMatrix: {} examples \u{00d7} {} labels",
            self.n_rows, self.n_cols
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_basic() {
        let m = ScoreMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.row(1), &[0.3, 0.4]);
        assert_eq!(m.get(0, 1), Some(0.2));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn from_rows_ragged_error() {
        let err = ScoreMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3]]);
        assert!(matches!(err, Err(AequoreaError::ShapeMismatch(_))));
    }

    #[test]
    fn from_rows_empty() {
        let m = ScoreMatrix::from_rows(vec![]).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn from_flat_round_trip() {
        let m = ScoreMatrix::from_flat(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_flat_bad_length() {
        assert!(ScoreMatrix::from_flat(vec![1.0, 2.0, 3.0], 2).is_err());
    }

    #[test]
    fn summary_line() {
        let m = ScoreMatrix::from_rows(vec![vec![0.0; 5]; 3]).unwrap();
        assert_eq!(m.summary(), "ScoreMatrix: 3 examples \u{00d7} 5 labels");
    }
}
