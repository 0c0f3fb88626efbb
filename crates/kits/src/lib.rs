//! Kit product variant engine.
//!
//! This crate turns an organizer's attribute definitions (e.g. Color, Size)
//! into concrete purchasable variants and lets a runner pick one of them step
//! by step during registration. It is pure, deterministic domain logic (no IO,
//! no HTTP, no storage); callers load and save [`ProductRecord`]s.

pub mod attribute;
pub mod codec;
pub mod generator;
pub mod product;
pub mod record;
pub mod selector;
pub mod session;
pub mod variant;

pub use attribute::{Attribute, AttributeSet};
pub use codec::{VariantLabel, decode, encode, reconstruct_attributes, slug};
pub use generator::{Existing, Generation, generate};
pub use product::{Product, ProductKind};
pub use record::{LoadedProduct, ProductRecord, VariantRecord};
pub use selector::{CascadingSelector, Resolution, Selection};
pub use session::{
    SessionAction, SessionChange, SessionCommand, SessionEvent, VariantConfigurationSession,
    VariantPatch,
};
pub use variant::Variant;
