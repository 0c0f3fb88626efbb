//! Variant configuration session (aggregate).
//!
//! One session holds everything an organizer edits for one kit product:
//! the attribute list, the in-memory generated variants, and the selection a
//! registration preview walks through. Edits arrive as commands; `handle`
//! decides the resulting events without touching state and `apply` evolves
//! it. Nothing is shared or global: callers own the session value and
//! persist the bundle returned by [`VariantConfigurationSession::finalize`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use racekit_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Event, SessionId};

use crate::attribute::{Attribute, AttributeSet};
use crate::generator::{Existing, Generation, generate};
use crate::product::Product;
use crate::record::{LoadedProduct, ProductRecord};
use crate::selector::{CascadingSelector, Resolution, Selection};
use crate::variant::Variant;

/// Aggregate root: VariantConfigurationSession.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantConfigurationSession {
    id: SessionId,
    product: Product,
    attributes: AttributeSet,
    /// In-memory rows from the last generation; cleared by attribute edits.
    generated: Option<Vec<Variant>>,
    /// Attributes changed since the variants in view were produced.
    stale: bool,
    selection: Selection,
    version: u64,
}

impl VariantConfigurationSession {
    /// Start a session for a product that has no persisted variants yet.
    pub fn new(id: SessionId, product: Product) -> Self {
        Self {
            id,
            product,
            attributes: AttributeSet::new(),
            generated: None,
            stale: false,
            selection: Selection::new(),
            version: 0,
        }
    }

    /// Start a session from a loaded record, keeping its rebuilt attributes.
    pub fn from_loaded(id: SessionId, loaded: LoadedProduct) -> Self {
        let mut session = Self::new(id, loaded.product);
        session.attributes = AttributeSet::from(loaded.attributes);
        session
    }

    /// Start a session from a persisted record.
    pub fn open(id: SessionId, record: ProductRecord) -> DomainResult<Self> {
        let loaded = record.load()?;
        tracing::debug!(
            session = %id,
            product = %loaded.product.name,
            attributes = loaded.attributes.len(),
            variants = loaded.product.variants.len(),
            "opened variant configuration session"
        );
        Ok(Self::from_loaded(id, loaded))
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_slice()
    }

    pub fn attribute_order(&self) -> &[String] {
        &self.product.variant_attribute_order
    }

    pub fn generated(&self) -> Option<&[Variant]> {
        self.generated.as_deref()
    }

    /// Attribute edits are pending a regeneration.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Variants in view: the generated list when present, else the persisted one.
    pub fn variants(&self) -> &[Variant] {
        self.generated.as_deref().unwrap_or(&self.product.variants)
    }

    pub fn selector(&self) -> CascadingSelector<'_> {
        CascadingSelector::new(&self.product.variant_attribute_order, self.variants())
    }

    pub fn available_values_for(&self, index: usize) -> Vec<String> {
        self.selector().available_values_for(&self.selection, index)
    }

    pub fn resolve(&self) -> Resolution<'_> {
        self.selector().resolve(&self.selection)
    }

    /// The product as it should be saved: full replace of its variant list.
    ///
    /// Fails while attribute edits are waiting for a regeneration, since the
    /// rows in view no longer match the attributes.
    pub fn finalize(&self) -> DomainResult<ProductRecord> {
        if self.stale {
            return Err(DomainError::invariant(
                "attributes changed; regenerate variants before saving",
            ));
        }

        let mut product = self.product.clone();
        if let Some(generated) = &self.generated {
            product.variants = generated.clone();
        }
        Ok(ProductRecord::from(&product))
    }
}

impl AggregateRoot for VariantConfigurationSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Operator edits to one generated row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPatch {
    pub sku: Option<String>,
    /// `Some(None)` switches stock tracking off.
    pub available_quantity: Option<Option<u32>>,
    /// `Some(None)` drops the override so the product price applies.
    pub price: Option<Option<u64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    AddAttribute,
    RemoveAttribute { index: usize },
    RenameAttribute { index: usize, name: String },
    AddValue { attribute: usize },
    RemoveValue { attribute: usize, value: usize },
    UpdateValue { attribute: usize, value: usize, new_value: String },
    GenerateVariants,
    UpdateVariant { index: usize, patch: VariantPatch },
    SelectValue { position: usize, value: String },
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCommand {
    pub session_id: SessionId,
    pub action: SessionAction,
    pub occurred_at: DateTime<Utc>,
}

impl SessionCommand {
    pub fn new(session_id: SessionId, action: SessionAction, occurred_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            action,
            occurred_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SessionChange {
    AttributeAdded,
    AttributeRemoved { index: usize, attribute: Attribute },
    AttributeRenamed { index: usize, name: String },
    ValueAdded { attribute: usize },
    ValueRemoved { attribute: usize, value: usize, removed: String },
    ValueUpdated { attribute: usize, value: usize, new_value: String },
    VariantsGenerated { generation: Generation },
    VariantUpdated { index: usize, variant: Variant },
    ValueSelected { position: usize, selection: Selection },
    SelectionCleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session_id: SessionId,
    pub change: SessionChange,
    pub occurred_at: DateTime<Utc>,
}

impl Event for SessionEvent {
    fn event_type(&self) -> &'static str {
        match self.change {
            SessionChange::AttributeAdded => "kits.attribute.added",
            SessionChange::AttributeRemoved { .. } => "kits.attribute.removed",
            SessionChange::AttributeRenamed { .. } => "kits.attribute.renamed",
            SessionChange::ValueAdded { .. } => "kits.value.added",
            SessionChange::ValueRemoved { .. } => "kits.value.removed",
            SessionChange::ValueUpdated { .. } => "kits.value.updated",
            SessionChange::VariantsGenerated { .. } => "kits.variants.generated",
            SessionChange::VariantUpdated { .. } => "kits.variant.updated",
            SessionChange::ValueSelected { .. } => "kits.selection.value_selected",
            SessionChange::SelectionCleared => "kits.selection.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl Aggregate for VariantConfigurationSession {
    type Command = SessionCommand;
    type Event = SessionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match &event.change {
            SessionChange::AttributeAdded => {
                // Unnamed and empty, so generation output is unchanged.
                self.attributes.push_empty();
            }
            SessionChange::AttributeRemoved { index, .. } => {
                self.attributes.remove(*index);
                self.invalidate();
                self.selection = Selection::new();
            }
            SessionChange::AttributeRenamed { index, name } => {
                // The order only lists generating attributes, so relabel the
                // slot this attribute occupies there, if it still holds its name.
                let position = self.attributes.valid_position(*index);
                let previous = self.attributes.get(*index).map(|a| a.key().to_string());
                self.attributes.rename(*index, name.clone());
                if let (Some(position), Some(previous)) = (position, previous) {
                    if let Some(slot) = self.product.variant_attribute_order.get_mut(position) {
                        if *slot == previous {
                            *slot = name.trim().to_string();
                        }
                    }
                }
                self.invalidate();
            }
            SessionChange::ValueAdded { attribute } => {
                self.attributes.push_value(*attribute);
                self.invalidate();
            }
            SessionChange::ValueRemoved { attribute, value, .. } => {
                self.attributes.remove_value(*attribute, *value);
                self.invalidate();
            }
            SessionChange::ValueUpdated {
                attribute,
                value,
                new_value,
            } => {
                self.attributes.set_value(*attribute, *value, new_value.clone());
                self.invalidate();
            }
            SessionChange::VariantsGenerated { generation } => {
                self.product.variant_attribute_order = generation.attribute_order.clone();
                self.generated = Some(generation.variants.clone());
                self.stale = false;
                self.selection = Selection::new();
            }
            SessionChange::VariantUpdated { index, variant } => {
                if let Some(slot) = self.generated.as_mut().and_then(|rows| rows.get_mut(*index)) {
                    *slot = variant.clone();
                }
            }
            SessionChange::ValueSelected { selection, .. } => {
                self.selection = selection.clone();
            }
            SessionChange::SelectionCleared => {
                self.selection = Selection::new();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        if command.session_id != self.id {
            return Err(DomainError::invariant("session_id mismatch"));
        }

        let change = match &command.action {
            SessionAction::AddAttribute => {
                self.ensure_variable()?;
                SessionChange::AttributeAdded
            }
            SessionAction::RemoveAttribute { index } => {
                self.ensure_variable()?;
                let attribute = self.attributes.ensure_attribute(*index)?.clone();
                SessionChange::AttributeRemoved {
                    index: *index,
                    attribute,
                }
            }
            SessionAction::RenameAttribute { index, name } => {
                self.ensure_variable()?;
                self.attributes.ensure_attribute(*index)?;
                self.attributes.ensure_unique_name(*index, name)?;
                SessionChange::AttributeRenamed {
                    index: *index,
                    name: name.clone(),
                }
            }
            SessionAction::AddValue { attribute } => {
                self.ensure_variable()?;
                self.attributes.ensure_attribute(*attribute)?;
                SessionChange::ValueAdded {
                    attribute: *attribute,
                }
            }
            SessionAction::RemoveValue { attribute, value } => {
                self.ensure_variable()?;
                let removed = self.attributes.ensure_value(*attribute, *value)?.to_string();
                SessionChange::ValueRemoved {
                    attribute: *attribute,
                    value: *value,
                    removed,
                }
            }
            SessionAction::UpdateValue {
                attribute,
                value,
                new_value,
            } => {
                self.ensure_variable()?;
                self.attributes.ensure_value(*attribute, *value)?;
                SessionChange::ValueUpdated {
                    attribute: *attribute,
                    value: *value,
                    new_value: new_value.clone(),
                }
            }
            SessionAction::GenerateVariants => self.handle_generate()?,
            SessionAction::UpdateVariant { index, patch } => self.handle_update_variant(*index, patch)?,
            SessionAction::SelectValue { position, value } => {
                let selection = self
                    .selector()
                    .select(&self.selection, *position, value.clone())?;
                SessionChange::ValueSelected {
                    position: *position,
                    selection,
                }
            }
            SessionAction::ClearSelection => SessionChange::SelectionCleared,
        };

        Ok(vec![SessionEvent {
            session_id: self.id,
            change,
            occurred_at: command.occurred_at,
        }])
    }
}

impl VariantConfigurationSession {
    fn invalidate(&mut self) {
        self.generated = None;
        self.stale = true;
    }

    fn ensure_variable(&self) -> DomainResult<()> {
        if !self.product.is_variable() {
            return Err(DomainError::invariant(
                "unique products do not have attributes",
            ));
        }
        Ok(())
    }

    fn handle_generate(&self) -> DomainResult<SessionChange> {
        self.ensure_variable()?;

        let existing = Existing::new(
            self.generated.as_deref().unwrap_or_default(),
            &self.product.variants,
        );
        let generation = generate(self.attributes.as_slice(), &self.product.name, existing);

        tracing::debug!(
            session = %self.id,
            variants = generation.variants.len(),
            "regenerated variants"
        );

        Ok(SessionChange::VariantsGenerated { generation })
    }

    fn handle_update_variant(&self, index: usize, patch: &VariantPatch) -> DomainResult<SessionChange> {
        let rows = self.generated.as_deref().ok_or_else(|| {
            DomainError::invariant("no generated variants to edit; generate variants first")
        })?;
        let current = rows
            .get(index)
            .ok_or_else(|| DomainError::out_of_range("variant", index, rows.len()))?;

        let mut variant = current.clone();
        if let Some(sku) = &patch.sku {
            if sku.trim().is_empty() {
                return Err(DomainError::validation("SKU cannot be empty"));
            }
            variant.sku = sku.trim().to_string();
        }
        if let Some(quantity) = patch.available_quantity {
            variant.available_quantity = quantity;
        }
        if let Some(price) = patch.price {
            variant.price = price;
        }

        Ok(SessionChange::VariantUpdated { index, variant })
    }
}
