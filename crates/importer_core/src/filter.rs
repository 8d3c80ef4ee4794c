use std::collections::BTreeMap;

use importer_logging::{import_debug, import_info};
use serde::Deserialize;

use crate::record::NamedTag;

/// Category inclusion rules, keyed by top-level category name.
///
/// A rule with an empty `sub_cats` list matches any record carrying its
/// category, regardless of subcategories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InclusionRules {
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryRule {
    #[serde(default)]
    pub sub_cats: Vec<String>,
}

impl InclusionRules {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Decides whether a record is in scope for import.
///
/// Matching is case-insensitive throughout. A record without any feed
/// categories is always out of scope; a record without subcategories is in
/// scope as soon as a rule's category matches (absence of subcategory data
/// is inclusion, not exclusion).
pub fn is_in_scope(
    categories: &[NamedTag],
    subcategories: &[NamedTag],
    rules: &InclusionRules,
    sku: &str,
) -> bool {
    if categories.is_empty() {
        import_info!("record {sku} carries no feed categories, out of scope");
        return false;
    }

    let feed_cats: Vec<String> = categories.iter().map(|t| t.name.to_lowercase()).collect();
    let feed_sub_cats: Vec<String> = subcategories
        .iter()
        .map(|t| t.name.to_lowercase())
        .collect();

    for (category, rule) in &rules.categories {
        if !feed_cats.contains(&category.to_lowercase()) {
            continue;
        }

        if feed_sub_cats.is_empty() {
            import_debug!("record {sku} has no feed subcategories, matched {category} alone");
            return true;
        }

        if rule.sub_cats.is_empty() {
            return true;
        }

        if rule
            .sub_cats
            .iter()
            .any(|sub| feed_sub_cats.contains(&sub.to_lowercase()))
        {
            return true;
        }

        import_debug!(
            "record {sku} matched {category} but none of {:?} in feed subcategories {:?}",
            rule.sub_cats,
            feed_sub_cats
        );
    }

    false
}
