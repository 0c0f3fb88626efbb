//! Persisted product shape exchanged with the storage/API layer.
//!
//! Products are loaded whole when an editing session opens and saved whole
//! on finalize (full replace, no deltas). Ids travel as strings; malformed
//! ones are rejected here rather than deeper in the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use racekit_core::{DomainError, DomainResult, ProductId, VariantId};

use crate::attribute::Attribute;
use crate::codec;
use crate::product::{Product, ProductKind};
use crate::variant::Variant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ProductKind,
    #[serde(default)]
    pub price: Option<u64>,
    /// Attribute names by position. Missing on rows saved before the order
    /// was persisted.
    #[serde(default)]
    pub variant_attributes: Option<Vec<String>>,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub available_quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// A record turned into domain values, with its attributes rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProduct {
    pub product: Product,
    pub attributes: Vec<Attribute>,
}

impl ProductRecord {
    pub fn from_json(json: &str) -> DomainResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("malformed product record: {e}")))
    }

    pub fn to_json(&self) -> DomainResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::validation(format!("unserializable product record: {e}")))
    }

    /// Convert into domain values and rebuild attribute definitions.
    pub fn load(self) -> DomainResult<LoadedProduct> {
        let id = self.id.as_deref().map(str::parse::<ProductId>).transpose()?;

        if self.kind == ProductKind::Unique && !self.variants.is_empty() {
            return Err(DomainError::validation(format!(
                "unique product '{}' cannot carry variants",
                self.name
            )));
        }

        let mut variants = self
            .variants
            .into_iter()
            .map(|row| row.into_variant(&self.name))
            .collect::<DomainResult<Vec<_>>>()?;

        let attributes = codec::reconstruct_attributes(&variants, self.variant_attributes.as_deref());
        let order: Vec<String> = attributes.iter().map(|a| a.name.clone()).collect();

        for variant in &mut variants {
            let tokens = variant.tokens();
            if tokens.len() != order.len() {
                tracing::warn!(
                    variant = %variant.name,
                    tokens = tokens.len(),
                    positions = order.len(),
                    "variant name does not decode to one token per attribute"
                );
            }
            if variant.attributes.is_empty() {
                variant.attributes = order.iter().cloned().zip(tokens).collect();
            }
        }

        Ok(LoadedProduct {
            product: Product {
                id,
                name: self.name,
                kind: self.kind,
                price: self.price,
                variant_attribute_order: order,
                variants,
            },
            attributes,
        })
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.map(|id| id.to_string()),
            name: product.name.clone(),
            kind: product.kind,
            price: product.price,
            variant_attributes: product
                .is_variable()
                .then(|| product.variant_attribute_order.clone()),
            variants: product.variants.iter().map(VariantRecord::from).collect(),
        }
    }
}

impl VariantRecord {
    fn into_variant(self, product_name: &str) -> DomainResult<Variant> {
        let id = self.id.as_deref().map(str::parse::<VariantId>).transpose()?;

        let available_quantity = self
            .available_quantity
            .map(u32::try_from)
            .transpose()
            .map_err(|_| {
                DomainError::validation(format!(
                    "variant '{}' has an invalid available_quantity",
                    self.name
                ))
            })?;

        let sku = match self.sku {
            Some(sku) if !sku.trim().is_empty() => sku,
            _ => codec::encode(product_name, &codec::decode(&self.name)).sku,
        };

        Ok(Variant {
            id,
            attributes: self.attributes,
            name: self.name,
            sku,
            available_quantity,
            price: self.price,
            group_name: self.variant_group_name,
        })
    }
}

impl From<&Variant> for VariantRecord {
    fn from(variant: &Variant) -> Self {
        Self {
            id: variant.id.map(|id| id.to_string()),
            name: variant.name.clone(),
            sku: Some(variant.sku.clone()),
            available_quantity: variant.available_quantity.map(i64::from),
            price: variant.price,
            variant_group_name: variant.group_name.clone(),
            attributes: variant.attributes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIT_SHIRT: &str = r#"{
        "id": "0190a2c4-7d1e-7c3a-9a51-2f6c1b0e4d11",
        "name": "Kit Shirt",
        "type": "variable",
        "price": 8000,
        "variant_attributes": ["Color", "Size"],
        "variants": [
            { "id": "0190a2c4-7d1e-7c3a-9a51-2f6c1b0e4d12", "name": "Yellow - P", "sku": "kit-shirt-yellow-p", "available_quantity": 3 },
            { "name": "Yellow - M", "available_quantity": null },
            { "name": "Green - P", "sku": "", "available_quantity": 0, "price": 9000 }
        ]
    }"#;

    #[test]
    fn load_rebuilds_attributes_from_saved_order() {
        let loaded = ProductRecord::from_json(KIT_SHIRT).unwrap().load().unwrap();

        assert_eq!(
            loaded.attributes,
            vec![
                Attribute::new("Color", ["Green", "Yellow"]),
                Attribute::new("Size", ["M", "P"]),
            ]
        );
        assert_eq!(loaded.product.variant_attribute_order, vec!["Color", "Size"]);
        assert_eq!(loaded.product.kind, ProductKind::Variable);
        assert!(loaded.product.id.is_some());

        let first = &loaded.product.variants[0];
        assert!(first.id.is_some());
        assert_eq!(first.available_quantity, Some(3));
        assert_eq!(first.attributes.get("Size").map(String::as_str), Some("P"));
    }

    #[test]
    fn load_derives_missing_skus() {
        let loaded = ProductRecord::from_json(KIT_SHIRT).unwrap().load().unwrap();
        assert_eq!(loaded.product.variants[1].sku, "kit-shirt-yellow-m");
        assert_eq!(loaded.product.variants[2].sku, "kit-shirt-green-p");
    }

    #[test]
    fn legacy_record_gets_placeholder_names() {
        let json = r#"{
            "name": "Kit",
            "type": "variable",
            "variants": [
                { "name": "Yellow - P", "variant_group_name": "Cor" },
                { "name": "Green - M" }
            ]
        }"#;
        let loaded = ProductRecord::from_json(json).unwrap().load().unwrap();
        assert_eq!(loaded.product.variant_attribute_order, vec!["Cor", "Attribute 2"]);
    }

    #[test]
    fn negative_stock_is_rejected() {
        let json = r#"{ "name": "Kit", "type": "variable", "variants": [ { "name": "P", "available_quantity": -1 } ] }"#;
        let err = ProductRecord::from_json(json).unwrap().load().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn malformed_variant_id_is_rejected() {
        let json = r#"{ "name": "Kit", "type": "variable", "variants": [ { "id": "42", "name": "P" } ] }"#;
        let err = ProductRecord::from_json(json).unwrap().load().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("VariantId")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn unique_product_with_variants_is_rejected() {
        let json = r#"{ "name": "Medal", "type": "unique", "variants": [ { "name": "P" } ] }"#;
        let err = ProductRecord::from_json(json).unwrap().load().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn garbage_json_is_a_validation_error() {
        let err = ProductRecord::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn saved_record_keeps_order_and_ids() {
        let loaded = ProductRecord::from_json(KIT_SHIRT).unwrap().load().unwrap();
        let saved = ProductRecord::from(&loaded.product);

        assert_eq!(
            saved.variant_attributes,
            Some(vec!["Color".to_string(), "Size".to_string()])
        );
        assert_eq!(
            saved.variants[0].id.as_deref(),
            Some("0190a2c4-7d1e-7c3a-9a51-2f6c1b0e4d12")
        );
        assert_eq!(saved.variants[2].available_quantity, Some(0));
        assert!(saved.to_json().unwrap().contains("\"type\": \"variable\""));
    }
}
