use serde::{Deserialize, Deserializer};

/// One product entry from the external catalog feed, identified by SKU.
///
/// Field names mirror the feed's wire format; the feed sends variant flags
/// as the literal strings `"Yes"`/`"No"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "Sku")]
    pub sku: String,
    #[serde(rename = "Naam", default)]
    pub name: String,
    #[serde(rename = "Omschrijving", default)]
    pub description: String,
    #[serde(rename = "Korte omschrijving", default)]
    pub short_description: String,
    #[serde(rename = "Aankoopprijs", default)]
    pub purchase_price: String,
    #[serde(rename = "Verkoopprijs", default)]
    pub sale_price: String,
    #[serde(rename = "Hoeveelheid in stock", default)]
    pub stock_quantity: i64,
    #[serde(rename = "Afbeeldingen", default)]
    pub images: ImageSet,
    #[serde(default, deserialize_with = "yes_no")]
    pub has_variants: bool,
    #[serde(default, deserialize_with = "yes_no")]
    pub is_part_of_variant: bool,
    /// Parent SKU for variation records; the feed's empty string is
    /// normalized to `None` at deserialization.
    #[serde(rename = "variant_parent", default, deserialize_with = "empty_as_none")]
    pub variant_parent: Option<String>,
    #[serde(default)]
    pub variant_children: Vec<String>,
    #[serde(default)]
    pub attributes: RecordAttributes,
}

/// Feed attributes block: category tags and free-format physical fields.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RecordAttributes {
    #[serde(default)]
    pub categories: Vec<NamedTag>,
    #[serde(default)]
    pub subcategories: Vec<NamedTag>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(rename = "afmetingen", default)]
    pub raw_dimensions: Option<String>,
}

/// A named tag as the feed sends it (`{"name": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedTag {
    pub name: String,
}

impl NamedTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Image URLs attached to a feed record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ImageSet {
    /// Main product image URL; empty when the feed has none.
    #[serde(rename = "Hoofd", default)]
    pub main: String,
}

impl CatalogRecord {
    /// Long description, falling back to the short one when empty.
    pub fn description_or_short(&self) -> &str {
        if self.description.is_empty() {
            &self.short_description
        } else {
            &self.description
        }
    }

    /// Data-quality warnings for inconsistent variant flags.
    ///
    /// None of these are fatal; the record is still processed with the
    /// flags as sent.
    pub fn consistency_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.has_variants && self.variant_children.is_empty() {
            warnings.push(format!(
                "record {} declares variants but lists no variant children",
                self.sku
            ));
        }
        if !self.has_variants && !self.variant_children.is_empty() {
            warnings.push(format!(
                "record {} declares no variants but lists variant children {:?}",
                self.sku, self.variant_children
            ));
        }
        if self.is_part_of_variant && self.variant_parent.is_none() {
            warnings.push(format!(
                "record {} is part of a variant but has no variant parent",
                self.sku
            ));
        }
        if let (false, Some(parent)) = (self.is_part_of_variant, self.variant_parent.as_deref()) {
            warnings.push(format!(
                "record {} is not part of a variant but names parent {parent}",
                self.sku
            ));
        }
        warnings
    }
}

/// A product as the commerce store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreProduct {
    pub id: u64,
    #[serde(default)]
    pub sku: String,
    /// ISO-8601 timestamp of the store's last modification.
    #[serde(default)]
    pub date_modified: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value == "Yes")
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|parent| !parent.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CatalogRecord {
        CatalogRecord {
            sku: "A-1".to_string(),
            name: String::new(),
            description: String::new(),
            short_description: String::new(),
            purchase_price: String::new(),
            sale_price: String::new(),
            stock_quantity: 0,
            images: ImageSet::default(),
            has_variants: false,
            is_part_of_variant: false,
            variant_parent: None,
            variant_children: Vec::new(),
            attributes: RecordAttributes::default(),
        }
    }

    #[test]
    fn description_falls_back_to_short() {
        let mut rec = record();
        rec.short_description = "short".to_string();
        assert_eq!(rec.description_or_short(), "short");
        rec.description = "long".to_string();
        assert_eq!(rec.description_or_short(), "long");
    }

    #[test]
    fn inconsistent_variant_flags_are_warned_not_fatal() {
        let mut rec = record();
        rec.has_variants = true;
        assert_eq!(rec.consistency_warnings().len(), 1);

        let mut rec = record();
        rec.is_part_of_variant = true;
        assert_eq!(rec.consistency_warnings().len(), 1);

        let mut rec = record();
        rec.variant_parent = Some("P-9".to_string());
        assert_eq!(rec.consistency_warnings().len(), 1);

        assert!(record().consistency_warnings().is_empty());
    }
}
