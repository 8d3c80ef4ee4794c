use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use importer_logging::import_warn;

use crate::record::{CatalogRecord, StoreProduct};

/// How an incoming catalog record relates to the store's current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// No store product exists for the SKU.
    New,
    /// A store product exists; `date_modified` drives the staleness check.
    Existing { id: u64, date_modified: String },
    /// Variation whose parent SKU is not in the store yet.
    VariationPendingParent,
    /// Variation whose parent resolved to a store product.
    VariationResolved { parent_id: u64 },
}

/// Classifies a record given the store lookups for its own SKU and, when it
/// is a variation, for its parent SKU.
///
/// An unresolved parent takes precedence over everything else: the record
/// is deferred even when the variation itself already exists, so updates
/// never run ahead of the parent. A resolved parent only matters for
/// records the store does not know yet; known variations go through the
/// regular update path.
pub fn classify(
    record: &CatalogRecord,
    existing: Option<&StoreProduct>,
    parent: Option<&StoreProduct>,
) -> Disposition {
    if record.is_part_of_variant && record.variant_parent.is_some() {
        match parent {
            None => return Disposition::VariationPendingParent,
            Some(parent) if existing.is_none() => {
                return Disposition::VariationResolved {
                    parent_id: parent.id,
                }
            }
            Some(_) => {}
        }
    }

    match existing {
        Some(product) => Disposition::Existing {
            id: product.id,
            date_modified: product.date_modified.clone(),
        },
        None => Disposition::New,
    }
}

/// True when enough time has passed since the store's last modification
/// for another update to be worthwhile.
///
/// A timestamp the store sends in a shape we cannot parse counts as stale;
/// the alternative would be a product that never updates again.
pub fn is_stale(date_modified: &str, now: DateTime<Utc>, threshold: Duration) -> bool {
    let Some(modified) = parse_store_timestamp(date_modified) else {
        import_warn!("unparseable store timestamp {date_modified:?}, treating as stale");
        return true;
    };
    now - modified >= threshold
}

/// Parses the store's `date_modified`. The store usually sends a naive
/// ISO-8601 local timestamp, occasionally a full RFC 3339 one.
pub fn parse_store_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
