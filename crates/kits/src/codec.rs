//! Naming/SKU codec.
//!
//! A variant's display name is its ordered attribute values joined by
//! [`NAME_SEPARATOR`]. Persisted variant rows keep only that string, so the
//! registration flow decodes names back into positional tokens.
//!
//! Decoding is lossy when a value itself contains `" - "`: `"Navy - Blue"` as
//! a single color reads back as two tokens. Nothing guards against that today.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use racekit_core::ValueObject;

use crate::attribute::Attribute;
use crate::variant::Variant;

/// Join token between values in a variant display name.
pub const NAME_SEPARATOR: &str = " - ";

/// Join token between slugs in a SKU.
pub const SKU_SEPARATOR: &str = "-";

/// Derived display name and SKU of one value combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantLabel {
    pub name: String,
    pub sku: String,
}

impl ValueObject for VariantLabel {}

/// Lowercase `text`, collapsing internal whitespace runs into a single `-`.
///
/// Leading and trailing whitespace is dropped rather than hyphenated, so a
/// product saved as `"Kit Shirt "` keeps the `kit-shirt` SKU prefix.
pub fn slug(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(SKU_SEPARATOR)
        .to_lowercase()
}

/// Build the display name and SKU for `values` of a product named `product_name`.
pub fn encode<S: AsRef<str>>(product_name: &str, values: &[S]) -> VariantLabel {
    let name = values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR);

    let mut sku = slug(product_name);
    for value in values {
        sku.push_str(SKU_SEPARATOR);
        sku.push_str(&slug(value.as_ref()));
    }

    VariantLabel { name, sku }
}

/// Split a display name back into its positional tokens.
pub fn decode(name: &str) -> Vec<String> {
    name.split(NAME_SEPARATOR)
        .map(|token| token.trim().to_string())
        .collect()
}

/// Rebuild attribute definitions from persisted variant rows.
///
/// With a saved attribute order, each position becomes one attribute whose
/// values are the sorted distinct tokens seen at that position. Rows written
/// before the order was persisted fall back to the legacy group name for the
/// first position and `"Attribute N"` placeholders after it.
pub fn reconstruct_attributes(variants: &[Variant], saved_order: Option<&[String]>) -> Vec<Attribute> {
    if variants.is_empty() {
        return Vec::new();
    }

    let decoded: Vec<Vec<String>> = variants.iter().map(|v| decode(&v.name)).collect();

    let names: Vec<String> = match saved_order {
        Some(order) if !order.is_empty() => order.to_vec(),
        _ => {
            let width = decoded.iter().map(Vec::len).max().unwrap_or(0);
            let group_name = variants
                .iter()
                .find_map(|v| v.group_name.as_deref())
                .map(str::trim)
                .filter(|name| !name.is_empty());
            tracing::debug!(
                width,
                has_group_name = group_name.is_some(),
                "reconstructing attributes without saved order"
            );
            (0..width)
                .map(|position| match (position, group_name) {
                    (0, Some(name)) => name.to_string(),
                    _ => placeholder_name(position),
                })
                .collect()
        }
    };

    names
        .into_iter()
        .enumerate()
        .map(|(position, name)| {
            let values: BTreeSet<&str> = decoded
                .iter()
                .filter_map(|tokens| tokens.get(position))
                .map(String::as_str)
                .filter(|token| !token.is_empty())
                .collect();
            Attribute::new(name, values)
        })
        .collect()
}

/// Placeholder for an attribute whose real name was never persisted.
pub fn placeholder_name(position: usize) -> String {
    format!("Attribute {}", position + 1)
}
