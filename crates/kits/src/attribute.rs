//! Attribute model: named axes (e.g. "Color") with ordered candidate values.
//!
//! Attributes are edited freely while an organizer configures a kit product.
//! Half-filled attributes are normal during editing, so nothing here rejects
//! them; [`Attribute::is_valid_for_generation`] decides whether an attribute
//! takes part in variant generation.

use serde::{Deserialize, Serialize};

use racekit_core::{DomainError, DomainResult, ValueObject};

/// One configurable axis of a variable product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl ValueObject for Attribute {}

impl Attribute {
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed attribute name as used in `variant_attribute_order`.
    pub fn key(&self) -> &str {
        self.name.trim()
    }

    /// Named, with at least one non-blank value.
    pub fn is_valid_for_generation(&self) -> bool {
        !self.key().is_empty() && self.values.iter().any(|v| !v.trim().is_empty())
    }

    /// Values that take part in generation, trimmed, blanks dropped.
    ///
    /// Repeated values collapse onto their first position.
    pub fn generation_values(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.values.len());
        for value in self.values.iter().map(|v| v.trim()) {
            if !value.is_empty() && !out.contains(&value) {
                out.push(value);
            }
        }
        out
    }
}

/// Indices of the attributes that take part in generation.
///
/// An attribute generates when it is valid on its own and no earlier
/// generating attribute has the same trimmed name; names key the variant
/// attribute map and the selection, so a repeat would shadow its first use.
pub fn generation_indices(attributes: &[Attribute]) -> Vec<usize> {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for (index, attribute) in attributes.iter().enumerate() {
        if attribute.is_valid_for_generation() && !seen.contains(&attribute.key()) {
            seen.push(attribute.key());
            out.push(index);
        }
    }
    out
}

/// Ordered attribute list of one product, with the positional edits the
/// product form performs.
///
/// The `ensure_*` methods only validate; the mutators assume a prior check
/// and turn an out-of-range index into a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(Vec<Attribute>);

impl AttributeSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Attribute] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.0.get(index)
    }

    /// Attributes that take part in generation, in definition order.
    pub fn valid(&self) -> impl Iterator<Item = &Attribute> {
        generation_indices(&self.0).into_iter().map(|i| &self.0[i])
    }

    /// Position of attribute `index` among the attributes that generate.
    pub fn valid_position(&self, index: usize) -> Option<usize> {
        generation_indices(&self.0).iter().position(|&i| i == index)
    }

    /// Rejects a non-blank `name` already used by another attribute.
    pub fn ensure_unique_name(&self, index: usize, name: &str) -> DomainResult<()> {
        let key = name.trim();
        if key.is_empty() {
            return Ok(());
        }
        let taken = self
            .0
            .iter()
            .enumerate()
            .any(|(i, attribute)| i != index && attribute.key() == key);
        if taken {
            return Err(DomainError::validation(format!(
                "attribute name '{key}' is already in use"
            )));
        }
        Ok(())
    }

    pub fn ensure_attribute(&self, index: usize) -> DomainResult<&Attribute> {
        self.0
            .get(index)
            .ok_or_else(|| DomainError::out_of_range("attribute", index, self.0.len()))
    }

    pub fn ensure_value(&self, attr_index: usize, value_index: usize) -> DomainResult<&str> {
        let attribute = self.ensure_attribute(attr_index)?;
        attribute
            .values
            .get(value_index)
            .map(String::as_str)
            .ok_or_else(|| DomainError::out_of_range("value", value_index, attribute.values.len()))
    }

    /// Append an unnamed attribute with no values.
    pub fn push_empty(&mut self) {
        self.0.push(Attribute::default());
    }

    pub fn remove(&mut self, index: usize) -> Option<Attribute> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.0.get_mut(index) {
            Some(attribute) => {
                attribute.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Append an empty value slot for the operator to fill in.
    pub fn push_value(&mut self, attr_index: usize) -> bool {
        match self.0.get_mut(attr_index) {
            Some(attribute) => {
                attribute.values.push(String::new());
                true
            }
            None => false,
        }
    }

    pub fn remove_value(&mut self, attr_index: usize, value_index: usize) -> Option<String> {
        let attribute = self.0.get_mut(attr_index)?;
        (value_index < attribute.values.len()).then(|| attribute.values.remove(value_index))
    }

    pub fn set_value(&mut self, attr_index: usize, value_index: usize, value: impl Into<String>) -> bool {
        match self
            .0
            .get_mut(attr_index)
            .and_then(|a| a.values.get_mut(value_index))
        {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }
}

impl From<Vec<Attribute>> for AttributeSet {
    fn from(value: Vec<Attribute>) -> Self {
        Self(value)
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_not_valid() {
        assert!(!Attribute::new("  ", ["P"]).is_valid_for_generation());
    }

    #[test]
    fn blank_values_only_is_not_valid() {
        assert!(!Attribute::new("Size", ["", "  "]).is_valid_for_generation());
        assert!(!Attribute::new("Size", Vec::<String>::new()).is_valid_for_generation());
    }

    #[test]
    fn generation_values_trim_skip_blanks_and_collapse_repeats() {
        let attribute = Attribute::new("Size", [" P", "", "M", "P ", "G"]);
        assert_eq!(attribute.generation_values(), vec!["P", "M", "G"]);
    }

    #[test]
    fn edits_follow_positions() {
        let mut set = AttributeSet::new();
        set.push_empty();
        assert!(set.rename(0, "Color"));
        assert!(set.push_value(0));
        assert!(set.set_value(0, 0, "Yellow"));
        assert!(set.push_value(0));
        assert!(set.set_value(0, 1, "Green"));

        assert_eq!(set.get(0), Some(&Attribute::new("Color", ["Yellow", "Green"])));
        assert_eq!(set.remove_value(0, 0).as_deref(), Some("Yellow"));
        assert_eq!(set.get(0).map(|a| a.values.clone()), Some(vec!["Green".to_string()]));
        assert!(set.remove(0).is_some());
        assert!(set.is_empty());
    }

    #[test]
    fn out_of_range_edits_are_no_ops() {
        let mut set = AttributeSet::from(vec![Attribute::new("Size", ["P"])]);
        assert!(!set.rename(3, "Color"));
        assert!(!set.push_value(1));
        assert!(!set.set_value(0, 5, "G"));
        assert!(set.remove_value(0, 1).is_none());
        assert!(set.remove(1).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ensure_reports_which_list_overflowed() {
        let set = AttributeSet::from(vec![Attribute::new("Size", ["P"])]);
        assert_eq!(
            set.ensure_attribute(2).unwrap_err(),
            DomainError::out_of_range("attribute", 2, 1)
        );
        assert_eq!(
            set.ensure_value(0, 4).unwrap_err(),
            DomainError::out_of_range("value", 4, 1)
        );
        assert_eq!(set.ensure_value(0, 0).unwrap(), "P");
    }

    #[test]
    fn repeated_name_generates_only_once() {
        let set = AttributeSet::from(vec![
            Attribute::new("Size", ["P", "M"]),
            Attribute::new(" Size ", ["G", "H"]),
            Attribute::new("Color", ["Yellow"]),
        ]);
        let names: Vec<&str> = set.valid().map(Attribute::key).collect();
        assert_eq!(names, vec!["Size", "Color"]);
        assert_eq!(set.valid_position(1), None);
        assert_eq!(set.valid_position(2), Some(1));
    }

    #[test]
    fn unique_name_check_ignores_self_and_blanks() {
        let set = AttributeSet::from(vec![
            Attribute::new("Size", ["P"]),
            Attribute::new("Color", ["Yellow"]),
            Attribute::default(),
        ]);
        assert!(set.ensure_unique_name(0, "Size").is_ok());
        assert!(set.ensure_unique_name(2, "  ").is_ok());
        assert!(set.ensure_unique_name(2, "Sleeve").is_ok());
        assert!(matches!(
            set.ensure_unique_name(1, " Size"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn valid_skips_incomplete_attributes() {
        let set = AttributeSet::from(vec![
            Attribute::new("Color", ["Yellow"]),
            Attribute::new("", ["X"]),
            Attribute::new("Size", [""]),
            Attribute::new("Sleeve", ["Long"]),
        ]);
        let names: Vec<&str> = set.valid().map(Attribute::key).collect();
        assert_eq!(names, vec!["Color", "Sleeve"]);
    }
}
