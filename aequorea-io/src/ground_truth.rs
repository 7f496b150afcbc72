//! Ground-truth annotation files.
//!
//! A headerless tab-separated file with one example per line:
//! `sequence_name <TAB> label,label,...`. A missing or empty second field
//! means the example has no true labels.

use std::fs::File;
use std::path::Path;

use ::csv::ReaderBuilder;
use aequorea_core::{AequoreaError, Result};
use aequorea_eval::{GroundTruthRecord, GroundTruthTable};

/// Read a ground-truth TSV into a [`GroundTruthTable`].
pub fn read_ground_truth(path: impl AsRef<Path>) -> Result<GroundTruthTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AequoreaError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AequoreaError::Parse(e.to_string()))?;
        let sequence_name = match record.get(0) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                return Err(AequoreaError::Parse(
                    "ground-truth record missing sequence name".into(),
                ))
            }
        };
        let true_labels = match record.get(1) {
            Some("") | None => Vec::new(),
            Some(field) => field.split(',').map(str::to_string).collect(),
        };
        records.push(GroundTruthRecord {
            sequence_name,
            true_labels,
        });
    }

    Ok(GroundTruthTable { records })
}
