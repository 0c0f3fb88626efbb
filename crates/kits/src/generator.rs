//! Variant generator: cartesian expansion of attribute values into variants.
//!
//! The first valid attribute is the outermost axis (varies slowest) and the
//! last is the innermost (varies fastest), which fixes both the token order
//! inside names and the row order shown to the organizer.
//!
//! Regeneration reconciles against earlier variants by exact display name.
//! Renaming a value therefore orphans the old row and produces a fresh one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute::{self, Attribute};
use crate::codec;
use crate::variant::Variant;

/// Variants known before a regeneration, searched in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Existing<'a> {
    /// In-memory rows from the current editing session.
    pub generated: &'a [Variant],
    /// Rows as last saved.
    pub persisted: &'a [Variant],
}

impl<'a> Existing<'a> {
    pub fn new(generated: &'a [Variant], persisted: &'a [Variant]) -> Self {
        Self {
            generated,
            persisted,
        }
    }

    fn find(&self, name: &str) -> Option<&'a Variant> {
        self.generated
            .iter()
            .find(|v| v.name == name)
            .or_else(|| self.persisted.iter().find(|v| v.name == name))
    }
}

/// Output of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Names of the attributes that took part, in position order.
    pub attribute_order: Vec<String>,
    pub variants: Vec<Variant>,
}

impl Generation {
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Expand `attributes` into one variant per value combination.
///
/// Attributes that are not valid for generation are skipped, as is any
/// attribute repeating the name of an earlier one. Rows found in
/// `existing` by name keep their id, stock, price override and SKU.
pub fn generate(attributes: &[Attribute], product_name: &str, existing: Existing<'_>) -> Generation {
    let valid: Vec<&Attribute> = attribute::generation_indices(attributes)
        .into_iter()
        .map(|i| &attributes[i])
        .collect();

    if valid.is_empty() {
        tracing::debug!(product = product_name, "no valid attributes; nothing to generate");
        return Generation::default();
    }

    let attribute_order: Vec<String> = valid.iter().map(|a| a.key().to_string()).collect();
    let axes: Vec<Vec<&str>> = valid.iter().map(|a| a.generation_values()).collect();

    let mut reused = 0usize;
    let variants: Vec<Variant> = cartesian(&axes)
        .into_iter()
        .map(|combination| {
            let label = codec::encode(product_name, &combination);
            let attributes: BTreeMap<String, String> = attribute_order
                .iter()
                .cloned()
                .zip(combination.iter().map(|v| v.to_string()))
                .collect();

            match existing.find(&label.name) {
                Some(prior) => {
                    reused += 1;
                    Variant {
                        id: prior.id,
                        attributes,
                        name: label.name,
                        sku: prior.sku.clone(),
                        available_quantity: prior.available_quantity,
                        price: prior.price,
                        group_name: None,
                    }
                }
                None => Variant {
                    id: None,
                    attributes,
                    name: label.name,
                    sku: label.sku,
                    available_quantity: None,
                    price: None,
                    group_name: None,
                },
            }
        })
        .collect();

    tracing::debug!(
        product = product_name,
        attributes = attribute_order.len(),
        variants = variants.len(),
        reused,
        "generated variants"
    );

    Generation {
        attribute_order,
        variants,
    }
}

/// Nested-loop product; earlier axes are the major (outer) ones.
fn cartesian<'v>(axes: &[Vec<&'v str>]) -> Vec<Vec<&'v str>> {
    let mut combinations: Vec<Vec<&'v str>> = vec![Vec::with_capacity(axes.len())];
    for axis in axes {
        let mut next = Vec::with_capacity(combinations.len() * axis.len());
        for prefix in &combinations {
            for value in axis {
                let mut combination = prefix.clone();
                combination.push(*value);
                next.push(combination);
            }
        }
        combinations = next;
    }
    combinations
}
