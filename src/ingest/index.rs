//! The indexed-document layout.
//!
//! A trailing table lists the byte offset where each spectrum element starts.
//! A spectrum's length is only known once the next start offset (or the end
//! of the indexed region) is seen, so spans come out one entry late.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::MzbinError;
use crate::location::{correct_offset, DataLocation};
use crate::traits::DataStorage;

/// One resolved table entry: an identifier and the bytes of its element.
#[derive(Debug, Clone)]
pub struct IndexedSpan {
    pub id: String,
    pub location: DataLocation,
}

/// Consumes table entries in order and emits resolved spans.
pub struct OffsetIndexIngest {
    storage: Arc<dyn DataStorage>,
    pending: Option<(String, u64)>,
    closed: bool,
}

impl OffsetIndexIngest {
    pub fn new(storage: Arc<dyn DataStorage>) -> Self {
        Self {
            storage,
            pending: None,
            closed: false,
        }
    }

    /// Records the start offset of `id` and returns the span of the entry
    /// before it, if there was one.
    pub fn push_entry(
        &mut self,
        id: impl Into<String>,
        offset: i64,
    ) -> Result<Option<IndexedSpan>, MzbinError> {
        if self.closed {
            return Err(MzbinError::IngestState(
                "index entry after the index was closed".to_string(),
            ));
        }
        let offset = correct_offset(offset)?;
        let previous = self.pending.replace((id.into(), offset));
        Ok(previous.and_then(|(prev_id, prev_offset)| self.span(prev_id, prev_offset, offset)))
    }

    /// Handles the closing marker: `end_offset` bounds the last pending entry.
    pub fn close(&mut self, end_offset: i64) -> Result<Option<IndexedSpan>, MzbinError> {
        if self.closed {
            return Ok(None);
        }
        self.closed = true;
        let end = correct_offset(end_offset)?;
        Ok(self
            .pending
            .take()
            .and_then(|(id, start)| self.span(id, start, end)))
    }

    fn span(&self, id: String, start: u64, end: u64) -> Option<IndexedSpan> {
        let length = end as i64 - start as i64;
        if length < 0 {
            log::error!(
                "Index entry {} starts at {} but the next entry starts at {}; skipping it",
                id,
                start,
                end
            );
            return None;
        }
        Some(IndexedSpan {
            location: DataLocation::new(Arc::clone(&self.storage), start as i64, length),
            id,
        })
    }
}

/// Resolved spans by identifier, iterable in table order.
#[derive(Debug, Default)]
pub struct SpectrumIndex {
    positions: HashMap<String, usize>,
    spans: Vec<IndexedSpan>,
}

impl SpectrumIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a whole table through an [`OffsetIndexIngest`].
    pub fn from_entries<I, S>(
        storage: Arc<dyn DataStorage>,
        entries: I,
        end_offset: i64,
    ) -> Result<Self, MzbinError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut ingest = OffsetIndexIngest::new(storage);
        let mut index = Self::new();
        for (id, offset) in entries {
            if let Some(span) = ingest.push_entry(id, offset)? {
                index.insert(span);
            }
        }
        if let Some(span) = ingest.close(end_offset)? {
            index.insert(span);
        }
        Ok(index)
    }

    /// Adds a span. A repeated identifier replaces the earlier span in place.
    pub fn insert(&mut self, span: IndexedSpan) {
        match self.positions.get(&span.id) {
            Some(&i) => {
                log::warn!("Duplicate index entry {}; keeping the later one", span.id);
                self.spans[i] = span;
            }
            None => {
                self.positions.insert(span.id.clone(), self.spans.len());
                self.spans.push(span);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&DataLocation> {
        self.positions.get(id).map(|&i| &self.spans[i].location)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedSpan> {
        self.spans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BinaryStorage;
    use tempfile::TempDir;

    fn storage(dir: &TempDir, contents: &[u8]) -> Arc<dyn DataStorage> {
        let path = dir.path().join("indexed.mzML");
        std::fs::write(&path, contents).unwrap();
        Arc::new(BinaryStorage::open(&path).unwrap())
    }

    #[test]
    fn test_spans_are_emitted_one_entry_late() {
        let dir = TempDir::new().unwrap();
        let mut ingest = OffsetIndexIngest::new(storage(&dir, b"<a>..</a><b>...</b>"));

        assert!(ingest.push_entry("a", 0).unwrap().is_none());
        let a = ingest.push_entry("b", 9).unwrap().unwrap();
        assert_eq!(a.id, "a");
        assert_eq!((a.location.offset(), a.location.length()), (0, 9));
        assert_eq!(a.location.bytes().unwrap(), b"<a>..</a>");

        let b = ingest.close(19).unwrap().unwrap();
        assert_eq!(b.id, "b");
        assert_eq!(b.location.bytes().unwrap(), b"<b>...</b>");

        assert!(ingest.close(19).unwrap().is_none());
        assert!(matches!(
            ingest.push_entry("c", 30),
            Err(MzbinError::IngestState(_))
        ));
    }

    #[test]
    fn test_negative_length_entry_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut ingest = OffsetIndexIngest::new(storage(&dir, b""));
        ingest.push_entry("late", 100).unwrap();
        assert!(ingest.push_entry("early", 50).unwrap().is_none());
        assert!(ingest.close(80).unwrap().is_some());
    }

    #[test]
    fn test_overflowed_offsets_are_corrected_before_lengths() {
        let dir = TempDir::new().unwrap();
        let mut ingest = OffsetIndexIngest::new(storage(&dir, b""));
        // 2^31 + 10 and 2^31 + 30 as written through a signed 32-bit field.
        ingest.push_entry("x", i32::MIN as i64 + 10).unwrap();
        let x = ingest.push_entry("y", i32::MIN as i64 + 30).unwrap().unwrap();
        assert_eq!(x.location.length(), 20);
        assert_eq!(x.location.offset(), (1i64 << 31) + 10);
    }

    #[test]
    fn test_spectrum_index_lookup_and_order() {
        let dir = TempDir::new().unwrap();
        let index = SpectrumIndex::from_entries(
            storage(&dir, b"firstsecondthird"),
            vec![("scan=1", 0), ("scan=2", 5), ("scan=3", 11)],
            16,
        )
        .unwrap();

        assert_eq!(index.len(), 3);
        let ids: Vec<&str> = index.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["scan=1", "scan=2", "scan=3"]);
        assert_eq!(index.get("scan=2").unwrap().bytes().unwrap(), b"second");
        assert!(index.get("scan=9").is_none());
    }
}
