use std::fmt;

use thiserror::Error;

/// Error from a single store API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreFailure,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for StoreError {}

/// Failure families for store calls. `Network` and `Timeout` form the
/// connectivity family the retry policy always retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFailure {
    Network,
    Timeout,
    HttpStatus(u16),
    InvalidResponse,
}

impl fmt::Display for StoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFailure::Network => write!(f, "network error"),
            StoreFailure::Timeout => write!(f, "timeout"),
            StoreFailure::HttpStatus(code) => write!(f, "http status {code}"),
            StoreFailure::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// Error fetching a catalog page. Unlike store errors these are fatal for
/// the run; pagination cannot continue past a hole.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(String),
    #[error("feed returned http status {0}")]
    HttpStatus(u16),
    #[error("feed response malformed: {0}")]
    InvalidResponse(String),
}

/// Outcome of processing one catalog record. Dry runs report the same
/// action the live run would have taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// Filtered out by the category inclusion rules.
    OutOfScope,
    /// Created as a standalone product.
    Created,
    /// Created as a variation under an existing parent.
    CreatedVariation { parent_id: u64 },
    /// Existing product updated.
    Updated { id: u64 },
    /// Existing product modified too recently; no update issued.
    SkippedFresh { id: u64 },
    /// Variation whose parent is not in the store yet; queued for the
    /// end-of-run pass.
    Deferred,
    /// Parent still missing in the final pass; record dropped for this run.
    DroppedUnresolvedParent,
    /// Store call failed past the retry policy; record skipped.
    Failed,
}

/// Counters for one processed page (or for the deferred pass).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSummary {
    pub page_num: u64,
    pub processed: usize,
    pub out_of_scope: usize,
    pub created: usize,
    pub created_variations: usize,
    pub updated: usize,
    pub skipped_fresh: usize,
    pub failed: usize,
    /// Deferred-queue size after this page.
    pub deferred_total: usize,
    /// Per-record actions in feed order, keyed by SKU.
    pub actions: Vec<(String, RecordAction)>,
}

impl PageSummary {
    pub fn new(page_num: u64) -> Self {
        Self {
            page_num,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, sku: String, action: RecordAction) {
        self.processed += 1;
        match action {
            RecordAction::OutOfScope => self.out_of_scope += 1,
            RecordAction::Created => self.created += 1,
            RecordAction::CreatedVariation { .. } => self.created_variations += 1,
            RecordAction::Updated { .. } => self.updated += 1,
            RecordAction::SkippedFresh { .. } => self.skipped_fresh += 1,
            RecordAction::Failed => self.failed += 1,
            RecordAction::Deferred | RecordAction::DroppedUnresolvedParent => {}
        }
        self.actions.push((sku, action));
    }
}
