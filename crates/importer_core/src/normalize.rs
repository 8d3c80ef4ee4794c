use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::record::CatalogRecord;

/// Failure while normalizing a raw feed field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("price value is empty after stripping currency marker")]
    EmptyPrice,
}

/// `WxHcm` dimension pattern, e.g. `30x40cm`.
static WIDTH_HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)x(\d+)cm").expect("pattern"));

/// Decimal-comma or integer number tokens, e.g. `12,5` or `12`.
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+,[0-9]+|[0-9]+").expect("pattern"));

/// A `{width, height, length}` triple; each component is an empty string
/// when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: String,
    pub height: String,
    pub length: String,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.width.is_empty() && self.height.is_empty() && self.length.is_empty()
    }
}

/// Strips the currency marker and all whitespace from a feed price string.
///
/// The remainder is passed through as-is: a non-numeric remainder is the
/// caller's problem (the feed's formats drift), only an empty remainder is
/// an error. Applying the function twice yields the same value.
pub fn parse_price(raw: &str) -> Result<String, NormalizeError> {
    let stripped: String = raw
        .chars()
        .filter(|c| *c != '€' && !c.is_whitespace())
        .collect();
    if stripped.is_empty() {
        return Err(NormalizeError::EmptyPrice);
    }
    Ok(stripped)
}

/// Extracts a dimension triple from a free-format feed string.
///
/// Tries the `WxHcm` pattern first, then the diameter marker `Ø` with at
/// least two number tokens (the second token is both width and height).
/// Anything else yields the all-empty triple.
pub fn parse_dimensions(raw: &str) -> Dimensions {
    if let Some(caps) = WIDTH_HEIGHT.captures(raw) {
        return Dimensions {
            width: caps[1].to_string(),
            height: caps[2].to_string(),
            length: String::new(),
        };
    }

    if raw.contains('Ø') {
        let numbers: Vec<&str> = NUMBER.find_iter(raw).map(|m| m.as_str()).collect();
        if let Some(second) = numbers.get(1) {
            return Dimensions {
                width: (*second).to_string(),
                height: (*second).to_string(),
                length: String::new(),
            };
        }
    }

    Dimensions::default()
}

/// Parses a feed weight string; missing or malformed weight is `None`.
pub fn parse_weight(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    text.replace(',', ".").parse::<f64>().ok()
}

/// Typed view of a catalog record's raw string fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedProduct {
    /// Sale price with currency marker stripped; empty when the feed sent
    /// nothing usable.
    pub sale_price: String,
    pub purchase_price: String,
    pub weight: Option<f64>,
    pub dimensions: Dimensions,
}

impl NormalizedProduct {
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            sale_price: parse_price(&record.sale_price).unwrap_or_default(),
            purchase_price: parse_price(&record.purchase_price).unwrap_or_default(),
            weight: parse_weight(record.attributes.weight.as_deref()),
            dimensions: record
                .attributes
                .raw_dimensions
                .as_deref()
                .map(parse_dimensions)
                .unwrap_or_default(),
        }
    }

    /// True when the sale price is zero or negative. Such products are
    /// hidden from the store catalog rather than offered for free.
    pub fn sale_price_non_positive(&self) -> bool {
        if self.sale_price == "0,00" {
            return true;
        }
        match self.sale_price.replace(',', ".").parse::<f64>() {
            Ok(value) => value <= 0.0,
            // Non-numeric remainder passes through unhidden.
            Err(_) => false,
        }
    }
}
