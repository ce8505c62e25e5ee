//! Wrap-around cursor over a preloaded, immutable dataset.

use serde::Serialize;

use crate::generator::MAX_PREALLOC;
use crate::publisher::BatchSource;

/// Default number of records handed out per batch.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Reads fixed-size chunks from an in-memory dataset, wrapping to the start at the end.
///
/// The records are loaded once and never modified; only the read position moves.
#[derive(Debug, Clone)]
pub struct DatasetCursor<T> {
    records: Vec<T>,
    position: usize,
    chunk_size: usize,
}

impl<T: Clone> DatasetCursor<T> {
    /// Wrap `records`, starting at index 0.
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            position: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the chunk size used by [`BatchSource::next_batch`].
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Return `size` records starting at the cursor, advancing it by one per record.
    ///
    /// An empty dataset yields an empty chunk and leaves the cursor untouched.
    pub fn next_chunk(&mut self, size: usize) -> Vec<T> {
        if self.records.is_empty() {
            return Vec::new();
        }
        let mut chunk = Vec::with_capacity(size.min(MAX_PREALLOC));
        for _ in 0..size {
            chunk.push(self.records[self.position].clone());
            self.position = (self.position + 1) % self.records.len();
        }
        chunk
    }

    /// Index of the next record to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order.
    pub fn records(&self) -> &[T] {
        &self.records
    }
}

impl<T: Clone + Serialize> BatchSource for DatasetCursor<T> {
    type Row = T;

    fn next_batch(&mut self) -> Vec<T> {
        self.next_chunk(self.chunk_size)
    }
}
