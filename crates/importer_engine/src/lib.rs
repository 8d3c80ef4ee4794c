//! Importer engine: store/feed IO and the reconciliation loop.
mod feed;
mod reconcile;
mod retry;
mod store;
mod types;

pub use feed::{CatalogFeed, FeedSettings, ReqwestCatalogFeed};
pub use reconcile::{ReconcileSettings, ReconciliationEngine};
pub use retry::RetryPolicy;
pub use store::{ReqwestStoreApi, StoreApi, StoreSettings};
pub use types::{FeedError, PageSummary, RecordAction, StoreError, StoreFailure};
