//! TSV inference shards.
//!
//! A shard is a headerless tab-separated file with one record per line: an
//! example identifier followed by one confidence value per vocabulary entry.
//! [`ShardReader`] yields records lazily; the file handle lives inside the
//! reader and is released on drop, so abandoning iteration early closes the
//! file.

use std::fs::File;
use std::path::{Path, PathBuf};

use ::csv::ReaderBuilder;
use aequorea_core::{AequoreaError, Result};
use aequorea_eval::InferenceRecord;

/// Lazy record iterator over one inference shard.
pub struct ShardReader {
    records: ::csv::StringRecordsIntoIter<File>,
}

impl ShardReader {
    /// Open a shard file for streaming.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AequoreaError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(file);
        Ok(Self {
            records: reader.into_records(),
        })
    }
}

impl Iterator for ShardReader {
    type Item = Result<InferenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(r) => r,
            Err(e) => return Some(Err(AequoreaError::Parse(e.to_string()))),
        };

        let mut fields = record.iter();
        let id = match fields.next() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => {
                return Some(Err(AequoreaError::Parse(
                    "shard record missing identifier".into(),
                )))
            }
        };

        let mut confidences = Vec::with_capacity(record.len().saturating_sub(1));
        for field in fields {
            match field.parse::<f64>() {
                Ok(v) => confidences.push(v),
                Err(e) => {
                    return Some(Err(AequoreaError::Parse(format!(
                        "bad confidence {field:?} for {id}: {e}"
                    ))))
                }
            }
        }

        Some(Ok(InferenceRecord { id, confidences }))
    }
}

/// Regular files of a directory, lexicographically sorted.
///
/// The sorted order is the stable shard order the batch reader relies on.
pub fn shard_paths(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn shard(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".tsv").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_records_in_order() {
        let file = shard(&["seq1\t0.9\t0.0\t0.5", "seq2\t0.0\t0.4\t0.0"]);
        let records: Vec<InferenceRecord> = ShardReader::open(file.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "seq1");
        assert_eq!(records[0].confidences, vec![0.9, 0.0, 0.5]);
        assert_eq!(records[1].id, "seq2");
    }

    #[test]
    fn empty_shard_yields_nothing() {
        let file = shard(&[]);
        assert!(ShardReader::open(file.path()).unwrap().next().is_none());
    }

    #[test]
    fn bad_confidence_is_parse_error() {
        let file = shard(&["seq1\t0.9\tnot-a-number"]);
        let mut reader = ShardReader::open(file.path()).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(AequoreaError::Parse(_)))
        ));
    }

    #[test]
    fn missing_identifier_is_parse_error() {
        let file = shard(&["\t0.9"]);
        let mut reader = ShardReader::open(file.path()).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(AequoreaError::Parse(_)))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            ShardReader::open("/nonexistent/shard.tsv"),
            Err(AequoreaError::Io(_))
        ));
    }

    #[test]
    fn shard_paths_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.tsv", "a.tsv", "c.tsv"] {
            std::fs::write(dir.path().join(name), "x\t0.1\n").unwrap();
        }
        let names: Vec<String> = shard_paths(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.tsv", "b.tsv", "c.tsv"]);
    }

    #[test]
    fn shard_paths_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.tsv"), "x\t0.1\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        assert_eq!(shard_paths(dir.path()).unwrap().len(), 1);
    }
}
