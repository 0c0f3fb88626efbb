use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use racekit_core::VariantId;

use crate::codec;

/// One concrete, purchasable combination of attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Assigned by the persistence layer; `None` until first saved.
    pub id: Option<VariantId>,
    /// Attribute name -> selected value.
    pub attributes: BTreeMap<String, String>,
    /// Values in attribute order, joined by `" - "`.
    pub name: String,
    pub sku: String,
    /// `None` means stock is not tracked.
    pub available_quantity: Option<u32>,
    /// Price override in smallest currency unit (e.g. centavos).
    pub price: Option<u64>,
    /// Legacy single-attribute label, only read when rebuilding attributes.
    pub group_name: Option<String>,
}

impl Variant {
    /// Unsaved variant with only a display name; everything else empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            attributes: BTreeMap::new(),
            name: name.into(),
            sku: String::new(),
            available_quantity: None,
            price: None,
            group_name: None,
        }
    }

    /// Positional values decoded from `name`.
    pub fn tokens(&self) -> Vec<String> {
        codec::decode(&self.name)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Untracked stock or a positive count.
    pub fn is_available(&self) -> bool {
        self.available_quantity.is_none_or(|qty| qty > 0)
    }

    /// Order-independent key built from the attribute map.
    ///
    /// Regeneration still reconciles by display name; this key survives an
    /// attribute reorder, which the name does not.
    pub fn combination_key(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}
