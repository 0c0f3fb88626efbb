//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Attributes, variant labels and selections are value objects: two attributes
/// named `"Size"` with values `["P", "M"]` are the same attribute wherever they
/// come from. To "modify" one, build a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct VariantLabel {
///     name: String,
///     sku: String,
/// }
///
/// impl ValueObject for VariantLabel {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
