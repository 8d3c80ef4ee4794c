use std::sync::Once;

use chrono::{Duration, TimeZone, Utc};
use importer_core::{
    classify, is_stale, CatalogRecord, Disposition, ImageSet, RecordAttributes, StoreProduct,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(importer_logging::initialize_for_tests);
}

fn record(sku: &str) -> CatalogRecord {
    CatalogRecord {
        sku: sku.to_string(),
        name: "Test product".to_string(),
        description: String::new(),
        short_description: String::new(),
        purchase_price: "€ 5,00".to_string(),
        sale_price: "€ 10,00".to_string(),
        stock_quantity: 3,
        images: ImageSet::default(),
        has_variants: false,
        is_part_of_variant: false,
        variant_parent: None,
        variant_children: Vec::new(),
        attributes: RecordAttributes::default(),
    }
}

fn variation(sku: &str, parent: &str) -> CatalogRecord {
    let mut rec = record(sku);
    rec.is_part_of_variant = true;
    rec.variant_parent = Some(parent.to_string());
    rec
}

fn store_product(id: u64, sku: &str) -> StoreProduct {
    StoreProduct {
        id,
        sku: sku.to_string(),
        date_modified: "2026-08-01T10:00:00".to_string(),
        parent_id: None,
    }
}

#[test]
fn unknown_sku_is_new() {
    init_logging();
    let rec = record("A-1");
    assert_eq!(classify(&rec, None, None), Disposition::New);
}

#[test]
fn known_sku_is_existing_with_store_state() {
    init_logging();
    let rec = record("A-1");
    let existing = store_product(42, "A-1");
    assert_eq!(
        classify(&rec, Some(&existing), None),
        Disposition::Existing {
            id: 42,
            date_modified: "2026-08-01T10:00:00".to_string()
        }
    );
}

#[test]
fn new_variation_with_resolved_parent() {
    init_logging();
    let rec = variation("A-1-red", "A-1");
    let parent = store_product(42, "A-1");
    assert_eq!(
        classify(&rec, None, Some(&parent)),
        Disposition::VariationResolved { parent_id: 42 }
    );
}

#[test]
fn variation_without_parent_is_pending_even_when_existing() {
    init_logging();
    let rec = variation("A-1-red", "A-1");
    assert_eq!(classify(&rec, None, None), Disposition::VariationPendingParent);

    // An existing variation still waits for its parent.
    let existing = store_product(7, "A-1-red");
    assert_eq!(
        classify(&rec, Some(&existing), None),
        Disposition::VariationPendingParent
    );
}

#[test]
fn existing_variation_with_resolved_parent_goes_to_update_path() {
    init_logging();
    let rec = variation("A-1-red", "A-1");
    let existing = store_product(7, "A-1-red");
    let parent = store_product(42, "A-1");
    assert_eq!(
        classify(&rec, Some(&existing), Some(&parent)),
        Disposition::Existing {
            id: 7,
            date_modified: "2026-08-01T10:00:00".to_string()
        }
    );
}

#[test]
fn variation_flag_without_parent_sku_falls_back_to_plain_classification() {
    init_logging();
    let mut rec = record("A-1");
    rec.is_part_of_variant = true;
    assert_eq!(classify(&rec, None, None), Disposition::New);
}

#[test]
fn staleness_threshold_is_inclusive() {
    init_logging();
    let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
    let threshold = Duration::hours(24);

    // One second short of the threshold: still fresh.
    assert!(!is_stale("2026-08-24T12:00:01", now, threshold));
    // Exactly at the threshold: stale.
    assert!(is_stale("2026-08-24T12:00:00", now, threshold));
    // Well beyond: stale.
    assert!(is_stale("2026-08-20T12:00:00", now, threshold));
}

#[test]
fn rfc3339_store_timestamps_are_understood() {
    init_logging();
    let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
    assert!(is_stale("2026-08-20T12:00:00+00:00", now, Duration::hours(24)));
    assert!(!is_stale("2026-08-25T11:00:00+00:00", now, Duration::hours(24)));
}

#[test]
fn unparseable_timestamp_counts_as_stale() {
    init_logging();
    let now = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
    assert!(is_stale("not a date", now, Duration::hours(24)));
    assert!(is_stale("", now, Duration::hours(24)));
}
