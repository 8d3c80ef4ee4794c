//! Importer core: pure reconciliation logic for the catalog sync.
mod classify;
mod deferred;
mod filter;
mod normalize;
mod payload;
mod record;

pub use classify::{classify, is_stale, parse_store_timestamp, Disposition};
pub use deferred::DeferredParentQueue;
pub use filter::{is_in_scope, CategoryRule, InclusionRules};
pub use normalize::{
    parse_dimensions, parse_price, parse_weight, Dimensions, NormalizeError, NormalizedProduct,
};
pub use payload::{
    build_full_payload, build_minimal_payload, DimensionPayload, ImagePayload, ProductPayload,
};
pub use record::{CatalogRecord, ImageSet, NamedTag, RecordAttributes, StoreProduct};
