//! Batching of streamed inference records.
//!
//! Inference output arrives as a lazy stream of (identifier, confidence
//! vector) records, usually spread over many shard files. [`BatchIter`]
//! groups any such stream into fixed-size batches; [`ShardRecords`]
//! concatenates per-file record iterators into one logical stream, opening at
//! most one file at a time. Together they bound peak memory to a single
//! batch's worth of vectors.

use std::path::{Path, PathBuf};

use aequorea_core::{AequoreaError, Result};

use crate::matrix::ScoreMatrix;

/// One (identifier, confidence vector) record from an inference source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InferenceRecord {
    /// Example identifier (e.g. a UniProt accession).
    pub id: String,
    /// Confidences over the vocabulary, indexed by vocabulary position.
    pub confidences: Vec<f64>,
}

/// A batch of stacked confidence vectors with their identifiers.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Identifiers, one per matrix row.
    pub ids: Vec<String>,
    /// Stacked confidence vectors.
    pub scores: ScoreMatrix,
}

/// Groups a fallible record stream into batches of at most `batch_size` rows.
///
/// The final batch may be short. If the stream ends with nothing accumulated,
/// no trailing empty batch is emitted. The accumulation counter resets only
/// when it exactly reaches `batch_size`, so when the underlying stream spans
/// several files, batches carry over file boundaries.
///
/// A record whose vector length differs from the others in its batch aborts
/// the stream with [`AequoreaError::ShapeMismatch`].
pub struct BatchIter<I> {
    records: I,
    batch_size: usize,
    ids: Vec<String>,
    rows: Vec<Vec<f64>>,
    counter: usize,
    done: bool,
}

impl<I> BatchIter<I>
where
    I: Iterator<Item = Result<InferenceRecord>>,
{
    /// Wrap a record stream.
    ///
    /// # Errors
    ///
    /// Returns [`AequoreaError::InvalidInput`] if `batch_size` is 0.
    pub fn new(records: I, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(AequoreaError::InvalidInput("batch_size must be > 0".into()));
        }
        Ok(Self {
            records,
            batch_size,
            ids: Vec::new(),
            rows: Vec::new(),
            counter: 0,
            done: false,
        })
    }

    fn take_batch(&mut self) -> Result<Batch> {
        let ids = std::mem::take(&mut self.ids);
        let scores = ScoreMatrix::from_rows(std::mem::take(&mut self.rows))?;
        Ok(Batch { ids, scores })
    }
}

impl<I> Iterator for BatchIter<I>
where
    I: Iterator<Item = Result<InferenceRecord>>,
{
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.records.next() {
                Some(Ok(record)) => {
                    if let Some(first) = self.rows.first() {
                        if record.confidences.len() != first.len() {
                            self.done = true;
                            return Some(Err(AequoreaError::ShapeMismatch(format!(
                                "record {:?} has {} confidences, expected {}",
                                record.id,
                                record.confidences.len(),
                                first.len()
                            ))));
                        }
                    }
                    self.ids.push(record.id);
                    self.rows.push(record.confidences);
                    self.counter += 1;
                    if self.counter == self.batch_size {
                        self.counter = 0;
                        return Some(self.take_batch());
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if self.ids.is_empty() {
                        return None;
                    }
                    return Some(self.take_batch());
                }
            }
        }
    }
}

/// One logical record stream over an ordered list of shard files.
///
/// Files are opened lazily, one at a time, in the given order; the current
/// reader (and its file handle) is dropped before the next file is opened,
/// and early abandonment of the iterator drops it too. The `progress`
/// callback fires once per file as it is opened.
pub struct ShardRecords<F, R, P> {
    paths: std::vec::IntoIter<PathBuf>,
    open: F,
    progress: P,
    current: Option<R>,
}

impl<F, R, P> ShardRecords<F, R, P>
where
    F: FnMut(&Path) -> Result<R>,
    R: Iterator<Item = Result<InferenceRecord>>,
    P: FnMut(&Path),
{
    /// Create a stream over `paths`, using `open` to turn each path into a
    /// per-file record iterator.
    pub fn new(paths: Vec<PathBuf>, open: F, progress: P) -> Self {
        Self {
            paths: paths.into_iter(),
            open,
            progress,
            current: None,
        }
    }
}

impl<F, R, P> Iterator for ShardRecords<F, R, P>
where
    F: FnMut(&Path) -> Result<R>,
    R: Iterator<Item = Result<InferenceRecord>>,
    P: FnMut(&Path),
{
    type Item = Result<InferenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(reader) = self.current.as_mut() {
                match reader.next() {
                    Some(item) => return Some(item),
                    // Release the file handle before opening the next shard.
                    None => self.current = None,
                }
            }
            let path = self.paths.next()?;
            (self.progress)(&path);
            match (self.open)(&path) {
                Ok(reader) => self.current = Some(reader),
                Err(e) => {
                    // Fatal: stop advancing past a shard that failed to open.
                    self.paths = Vec::new().into_iter();
                    return Some(Err(e));
                }
            }
        }
    }
}
