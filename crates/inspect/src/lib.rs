//! `racekit-inspect`: look at a persisted kit product the way the engine does.
//!
//! Loads a product record, rebuilds its attributes, regenerates variants to
//! spot rows that drifted from the cartesian set, and walks a runner-style
//! selection through the cascading selector.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;

use racekit_kits::{Attribute, Existing, ProductRecord, Selection, generate};

/// Environment variable naming the product file when no path argument is given.
pub const PRODUCT_FILE_ENV: &str = "RACEKIT_PRODUCT_FILE";

/// `racekit-inspect [PRODUCT_FILE] [VALUE...]`
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "racekit-inspect")]
#[command(about = "Inspect a persisted kit product and walk a variant selection", long_about = None)]
pub struct InspectConfig {
    /// Product record (JSON). Falls back to `RACEKIT_PRODUCT_FILE`.
    #[arg(env = PRODUCT_FILE_ENV)]
    pub product_file: PathBuf,

    /// Values to pick, one per attribute position.
    #[arg(trailing_var_arg = true)]
    pub selections: Vec<String>,
}

pub fn load(path: &Path) -> anyhow::Result<ProductRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read product file {}", path.display()))?;
    let record = ProductRecord::from_json(&json)
        .with_context(|| format!("failed to parse product file {}", path.display()))?;
    Ok(record)
}

/// One attribute position as a runner would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub attribute: String,
    pub offered: Vec<String>,
    pub chosen: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub product: String,
    pub attributes: Vec<Attribute>,
    pub variant_count: usize,
    /// Names a regeneration would add (combinations missing from the record).
    pub missing: Vec<String>,
    /// Persisted names a regeneration would drop.
    pub orphaned: Vec<String>,
    pub steps: Vec<Step>,
    pub resolved: Option<String>,
}

pub fn inspect(record: ProductRecord, selections: &[String]) -> anyhow::Result<Report> {
    let loaded = record.load().context("product record is not usable")?;
    let product = &loaded.product;

    let order = &product.variant_attribute_order;
    if selections.len() > order.len() {
        bail!(
            "{} values given but '{}' has {} attribute(s)",
            selections.len(),
            product.name,
            order.len()
        );
    }

    let regenerated = generate(&loaded.attributes, &product.name, Existing::new(&[], &product.variants));
    let persisted: BTreeSet<&str> = product.variants.iter().map(|v| v.name.as_str()).collect();
    let fresh: BTreeSet<&str> = regenerated.variants.iter().map(|v| v.name.as_str()).collect();

    let selector = product.selector();
    let mut selection = Selection::new();
    let mut steps = Vec::with_capacity(order.len());
    for (position, attribute) in order.iter().enumerate() {
        let offered = selector.available_values_for(&selection, position);
        let chosen = selections.get(position).cloned();
        if let Some(value) = &chosen {
            if !offered.contains(value) {
                tracing::warn!(attribute = %attribute, value = %value, "value is not currently offered");
            }
            selection = selector
                .select(&selection, position, value.clone())
                .with_context(|| format!("cannot select '{value}' for {attribute}"))?;
        }
        steps.push(Step {
            attribute: attribute.clone(),
            offered,
            chosen,
        });
    }

    let resolved = selector.resolve(&selection).variant().map(|v| v.name.clone());
    tracing::info!(
        product = %product.name,
        variants = product.variants.len(),
        resolved = resolved.is_some(),
        "inspected product"
    );

    Ok(Report {
        product: product.name.clone(),
        attributes: loaded.attributes.clone(),
        variant_count: product.variants.len(),
        missing: fresh.difference(&persisted).map(|s| s.to_string()).collect(),
        orphaned: persisted.difference(&fresh).map(|s| s.to_string()).collect(),
        steps,
        resolved,
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} variants)", self.product, self.variant_count)?;
        for attribute in &self.attributes {
            writeln!(f, "  {}: {}", attribute.name, attribute.values.join(", "))?;
        }
        for name in &self.missing {
            writeln!(f, "  missing: {name}")?;
        }
        for name in &self.orphaned {
            writeln!(f, "  orphaned: {name}")?;
        }
        for step in &self.steps {
            write!(f, "  {} [{}]", step.attribute, step.offered.join(", "))?;
            match &step.chosen {
                Some(value) => writeln!(f, " -> {value}")?,
                None => writeln!(f)?,
            }
        }
        match &self.resolved {
            Some(name) => write!(f, "resolved: {name}"),
            None => write!(f, "unresolved"),
        }
    }
}
