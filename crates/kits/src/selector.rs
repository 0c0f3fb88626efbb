//! Cascading selector used by the registration wizard.
//!
//! Runners pick one attribute at a time in `variant_attribute_order`. Each
//! step narrows the values offered for the next one to combinations that
//! exist and are in stock. No state machine is materialized: every answer is
//! derived from the variant list and the current [`Selection`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use racekit_core::{DomainError, DomainResult, ValueObject};

use crate::variant::Variant;

/// Attribute name -> chosen value, for one runner's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

impl ValueObject for Selection {}

impl Selection {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outcome of [`CascadingSelector::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Every position is chosen and names an existing variant.
    Resolved(&'a Variant),
    /// Still mid-selection, or the chosen values match no variant.
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn variant(self) -> Option<&'a Variant> {
        match self {
            Resolution::Resolved(variant) => Some(variant),
            Resolution::Unresolved => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Read-only view over one product's variants in attribute order.
#[derive(Debug, Clone, Copy)]
pub struct CascadingSelector<'a> {
    order: &'a [String],
    variants: &'a [Variant],
}

impl<'a> CascadingSelector<'a> {
    pub fn new(order: &'a [String], variants: &'a [Variant]) -> Self {
        Self { order, variants }
    }

    pub fn order(&self) -> &'a [String] {
        self.order
    }

    pub fn attribute_name(&self, index: usize) -> Option<&'a str> {
        self.order.get(index).map(String::as_str)
    }

    /// Sorted, distinct values offered at `index`.
    ///
    /// Only in-stock variants that agree with every earlier position holding
    /// a choice contribute. Earlier positions without a choice do not
    /// constrain anything, so calling this ahead of the wizard returns the
    /// full candidate set.
    pub fn available_values_for(&self, selection: &Selection, index: usize) -> Vec<String> {
        if index >= self.order.len() {
            return Vec::new();
        }

        let values: BTreeSet<String> = self
            .variants
            .iter()
            .filter(|v| v.is_available())
            .filter_map(|v| {
                let tokens = v.tokens();
                self.agrees_before(selection, &tokens, index)
                    .then(|| tokens.into_iter().nth(index))
                    .flatten()
            })
            .collect();

        values.into_iter().collect()
    }

    /// Choose `value` at `index`, dropping every later choice.
    pub fn select(&self, selection: &Selection, index: usize, value: impl Into<String>) -> DomainResult<Selection> {
        DomainError::check_index("attribute position", index, self.order.len())?;

        let mut next: BTreeMap<String, String> = self.order[..index]
            .iter()
            .filter_map(|name| selection.0.get_key_value(name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        next.insert(self.order[index].clone(), value.into());

        Ok(Selection(next))
    }

    /// Every position in the order has a choice.
    pub fn is_complete(&self, selection: &Selection) -> bool {
        !self.order.is_empty() && self.order.iter().all(|name| selection.get(name).is_some())
    }

    /// The variant named by a complete selection.
    pub fn resolve(&self, selection: &Selection) -> Resolution<'a> {
        if !self.is_complete(selection) {
            return Resolution::Unresolved;
        }

        let wanted: Vec<&str> = self
            .order
            .iter()
            .filter_map(|name| selection.get(name))
            .collect();

        self.variants
            .iter()
            .find(|v| v.tokens() == wanted)
            .map_or(Resolution::Unresolved, Resolution::Resolved)
    }

    fn agrees_before(&self, selection: &Selection, tokens: &[String], index: usize) -> bool {
        self.order[..index]
            .iter()
            .enumerate()
            .all(|(position, name)| match selection.get(name) {
                Some(chosen) => tokens.get(position).is_some_and(|t| t == chosen),
                None => true,
            })
    }
}
