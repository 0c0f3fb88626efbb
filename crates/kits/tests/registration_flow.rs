//! Organizer configures a kit, saves it, and a runner picks a variant from the
//! saved record.

use chrono::Utc;

use racekit_core::{Aggregate, SessionId};
use racekit_kits::{
    Attribute, Existing, Product, ProductKind, ProductRecord, Selection, SessionAction,
    SessionCommand, VariantConfigurationSession, VariantPatch, encode, generate,
};

fn run(session: &mut VariantConfigurationSession, action: SessionAction) {
    let cmd = SessionCommand::new(session.id_typed(), action, Utc::now());
    session.execute(&cmd).unwrap();
}

#[test]
fn saved_kit_drives_registration_selection() {
    let mut session = VariantConfigurationSession::new(
        SessionId::new(),
        Product::new("Kit Shirt", ProductKind::Variable),
    );

    run(&mut session, SessionAction::AddAttribute);
    run(
        &mut session,
        SessionAction::RenameAttribute {
            index: 0,
            name: "Color".into(),
        },
    );
    for (i, color) in ["Yellow", "Green"].into_iter().enumerate() {
        run(&mut session, SessionAction::AddValue { attribute: 0 });
        run(
            &mut session,
            SessionAction::UpdateValue {
                attribute: 0,
                value: i,
                new_value: color.into(),
            },
        );
    }
    run(&mut session, SessionAction::AddAttribute);
    run(
        &mut session,
        SessionAction::RenameAttribute {
            index: 1,
            name: "Size".into(),
        },
    );
    for (i, size) in ["P", "M", "G"].into_iter().enumerate() {
        run(&mut session, SessionAction::AddValue { attribute: 1 });
        run(
            &mut session,
            SessionAction::UpdateValue {
                attribute: 1,
                value: i,
                new_value: size.into(),
            },
        );
    }
    run(&mut session, SessionAction::GenerateVariants);
    // Yellow - G sold out.
    run(
        &mut session,
        SessionAction::UpdateVariant {
            index: 2,
            patch: VariantPatch {
                available_quantity: Some(Some(0)),
                ..VariantPatch::default()
            },
        },
    );

    let json = session.finalize().unwrap().to_json().unwrap();

    // Registration side: only the persisted JSON is available.
    let loaded = ProductRecord::from_json(&json).unwrap().load().unwrap();
    let product = loaded.product;
    assert_eq!(product.variants.len(), 6);

    let selector = product.selector();
    let selection = selector.select(&Selection::new(), 0, "Yellow").unwrap();
    assert_eq!(selector.available_values_for(&selection, 1), vec!["M", "P"]);

    let selection = selector.select(&selection, 1, "M").unwrap();
    let chosen = selector.resolve(&selection).variant().unwrap();
    assert_eq!(chosen.name, "Yellow - M");
    assert_eq!(chosen.sku, encode("Kit Shirt", &["Yellow", "M"]).sku);
}

#[test]
fn regenerating_from_a_loaded_record_is_stable() {
    let generation = generate(
        &[
            Attribute::new("Color", ["Yellow", "Green"]),
            Attribute::new("Size", ["P", "M", "G"]),
        ],
        "Kit Shirt",
        Existing::default(),
    );
    let mut product = Product::new("Kit Shirt", ProductKind::Variable);
    product.variant_attribute_order = generation.attribute_order.clone();
    product.variants = generation.variants.clone();

    let loaded = ProductRecord::from(&product).load().unwrap();
    let again = generate(
        &loaded.attributes,
        "Kit Shirt",
        Existing::new(&[], &loaded.product.variants),
    );

    // Rebuilt value lists are sorted, so only the set of names is stable.
    let mut before: Vec<&str> = generation.variants.iter().map(|v| v.name.as_str()).collect();
    let mut after: Vec<&str> = again.variants.iter().map(|v| v.name.as_str()).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}
