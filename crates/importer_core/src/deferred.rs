use crate::record::CatalogRecord;

/// Variation records whose parent product was not in the store when they
/// were processed.
///
/// Entries are appended during the main pass and drained exactly once
/// afterwards for a single retry. Nothing is persisted across runs: a
/// crash loses in-flight entries, which are re-derived from the catalog on
/// the next run.
#[derive(Debug, Default)]
pub struct DeferredParentQueue {
    entries: Vec<CatalogRecord>,
}

impl DeferredParentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CatalogRecord) {
        self.entries.push(record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Takes all entries, leaving the queue empty, in encounter order.
    pub fn drain(&mut self) -> Vec<CatalogRecord> {
        std::mem::take(&mut self.entries)
    }
}
