use serde::Serialize;

use crate::normalize::NormalizedProduct;
use crate::record::CatalogRecord;

/// Image entry in a store payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    pub src: String,
    pub name: String,
    pub alt: String,
}

/// Dimension block in a store payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionPayload {
    pub length: String,
    pub width: String,
    pub height: String,
}

/// Body of a store create/update request. Optional fields are omitted from
/// the serialized JSON entirely rather than sent as null.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProductPayload {
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub regular_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImagePayload>,
    pub stock_quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<DimensionPayload>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_visibility: Option<String>,
}

/// Full payload for creating a standalone product: name, descriptions,
/// price, stock, images, weight when positive, dimensions when any
/// component is known, and the product type derived from the variant flag.
pub fn build_full_payload(record: &CatalogRecord, normalized: &NormalizedProduct) -> ProductPayload {
    let images = if record.images.main.is_empty() {
        Vec::new()
    } else {
        vec![ImagePayload {
            src: record.images.main.clone(),
            name: record.name.clone(),
            alt: record.name.clone(),
        }]
    };

    let dimensions = if normalized.dimensions.is_empty() {
        None
    } else {
        Some(DimensionPayload {
            length: normalized.dimensions.length.clone(),
            width: normalized.dimensions.width.clone(),
            height: normalized.dimensions.height.clone(),
        })
    };

    // Variations get their type from the parent; only standalone products
    // declare one.
    let product_type = if record.variant_parent.is_none() {
        let kind = if record.has_variants { "variable" } else { "simple" };
        Some(kind.to_string())
    } else {
        None
    };

    let mut payload = ProductPayload {
        sku: record.sku.clone(),
        name: Some(record.name.clone()),
        regular_price: normalized.sale_price.clone(),
        description: Some(record.description_or_short().to_string()),
        short_description: Some(record.short_description.clone()),
        images,
        stock_quantity: record.stock_quantity,
        weight: normalized.weight.filter(|w| *w > 0.0).map(|w| w.to_string()),
        dimensions,
        product_type,
        catalog_visibility: None,
    };
    apply_visibility(&mut payload, normalized);
    payload
}

/// Minimal payload for variation creates and existing-product updates:
/// sku, price and stock only.
pub fn build_minimal_payload(
    record: &CatalogRecord,
    normalized: &NormalizedProduct,
) -> ProductPayload {
    let mut payload = ProductPayload {
        sku: record.sku.clone(),
        regular_price: normalized.sale_price.clone(),
        stock_quantity: record.stock_quantity,
        ..ProductPayload::default()
    };
    apply_visibility(&mut payload, normalized);
    payload
}

/// A non-positive sale price hides the product from the store catalog,
/// overriding whatever visibility the branch would otherwise leave.
fn apply_visibility(payload: &mut ProductPayload, normalized: &NormalizedProduct) {
    if normalized.sale_price_non_positive() {
        payload.catalog_visibility = Some("hidden".to_string());
    }
}
