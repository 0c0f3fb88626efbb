use serde::{Deserialize, Serialize};

use racekit_core::ProductId;

use crate::selector::CascadingSelector;
use crate::variant::Variant;

/// Whether a product is sold as-is or through attribute variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Single SKU, no attributes.
    #[default]
    Unique,
    /// Attributes expanded into variants.
    Variable,
}

/// A kit product as the variant engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// `None` until the product is first saved.
    pub id: Option<ProductId>,
    pub name: String,
    pub kind: ProductKind,
    /// Base price in smallest currency unit, inherited by variants without
    /// their own override.
    pub price: Option<u64>,
    /// Attribute names by position, as persisted at the last generation.
    pub variant_attribute_order: Vec<String>,
    pub variants: Vec<Variant>,
}

impl Product {
    pub fn new(name: impl Into<String>, kind: ProductKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            price: None,
            variant_attribute_order: Vec::new(),
            variants: Vec::new(),
        }
    }

    pub fn is_variable(&self) -> bool {
        self.kind == ProductKind::Variable
    }

    /// Price charged for `variant`: its override, else the product price.
    pub fn effective_price(&self, variant: &Variant) -> Option<u64> {
        variant.price.or(self.price)
    }

    /// Selector over the persisted variants.
    pub fn selector(&self) -> CascadingSelector<'_> {
        CascadingSelector::new(&self.variant_attribute_order, &self.variants)
    }

    /// At least one variant can still be bought (always true for unique products).
    pub fn has_stock(&self) -> bool {
        !self.is_variable() || self.variants.iter().any(Variant::is_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_price_overrides_product_price() {
        let mut product = Product::new("Kit Shirt", ProductKind::Variable);
        product.price = Some(8_000);

        let mut variant = Variant::named("Yellow - P");
        assert_eq!(product.effective_price(&variant), Some(8_000));
        variant.price = Some(9_500);
        assert_eq!(product.effective_price(&variant), Some(9_500));
    }

    #[test]
    fn sold_out_variable_product_has_no_stock() {
        let mut product = Product::new("Kit Shirt", ProductKind::Variable);
        let mut variant = Variant::named("Yellow - P");
        variant.available_quantity = Some(0);
        product.variants.push(variant);
        assert!(!product.has_stock());

        assert!(Product::new("Medal", ProductKind::Unique).has_stock());
    }
}
