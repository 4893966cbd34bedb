// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{collections::BTreeSet, path::PathBuf};

use doctype_builder::{
    JsonDirectorySource, SchemaBuildingError, SchemaConfig, build_schema,
    build_schema_from_source,
    closure::{DocTypeIndex, resolve_closure},
    collect_snapshot,
    error::ReferenceRole,
    source::RawSnapshot,
};
use doctype_model::{
    doctype::{DocTypeKind, FieldKind, Nullability},
    overrides::DocTypeOverride,
    schema::Schema,
    serializer::SchemaSerializer,
    token::FieldTypeToken,
    whitelist::NamespaceNode,
};

fn fixture_source() -> JsonDirectorySource {
    JsonDirectorySource::new(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("erp"),
    )
}

async fn fixture_snapshot() -> RawSnapshot {
    collect_snapshot(&fixture_source()).await.unwrap()
}

fn config(doctypes: &[&str]) -> SchemaConfig {
    SchemaConfig::new(doctypes.iter().copied(), Vec::<DocTypeOverride>::new()).unwrap()
}

fn names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    names.collect()
}

#[tokio::test]
async fn child_tables_are_generated_and_links_become_dummies() {
    let schema = build_schema_from_source(&fixture_source(), &config(&["Invoice"]))
        .await
        .unwrap();

    assert_eq!(
        names(schema.generated().iter().map(|d| d.name.as_str())),
        vec!["Invoice", "InvoiceItem", "User"]
    );
    assert_eq!(
        names(schema.dummies().iter().map(|d| d.name.as_str())),
        vec!["Customer", "Item"]
    );
    assert_eq!(
        schema.doctype("InvoiceItem").unwrap().kind,
        DocTypeKind::Child
    );
    assert_eq!(schema.dummy("Customer").unwrap().kind, DocTypeKind::Normal);
}

#[tokio::test]
async fn select_options_are_cleaned() {
    let schema = build_schema(&fixture_snapshot().await, &config(&["Invoice"])).unwrap();
    let status = schema.doctype("Invoice").unwrap().field("status").unwrap();

    let expected: BTreeSet<String> = ["Cancelled", "Draft", "Submitted"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(status.kind, FieldKind::Select { options: expected });
}

#[test]
fn empty_request_is_rejected() {
    assert!(matches!(
        resolve_closure(&BTreeSet::new(), &DocTypeIndex::default()),
        Err(SchemaBuildingError::InvalidConfiguration(_))
    ));

    let from_config: Result<SchemaConfig, SchemaBuildingError> =
        SchemaConfig::from_toml_str("doctypes = []").map_err(Into::into);
    assert!(matches!(
        from_config,
        Err(SchemaBuildingError::InvalidConfiguration(_))
    ));
}

#[tokio::test]
async fn unmappable_fields_are_dropped() {
    let schema = build_schema(&fixture_snapshot().await, &config(&["Invoice"])).unwrap();
    let invoice = schema.doctype("Invoice").unwrap();

    for dropped in ["foo", "section_break_1", "tags", "map"] {
        assert!(invoice.field(dropped).is_none(), "{dropped} should be dropped");
    }
    assert_eq!(
        names(invoice.fields.iter().map(|f| f.name.as_str())),
        vec![
            "amount",
            "creation",
            "customer",
            "docstatus",
            "idx",
            "lines",
            "modified",
            "modified_by",
            "name",
            "owner",
            "po_number",
            "posting_date",
            "reference_doctype",
            "reference_name",
            "remarks",
            "signature",
            "status",
        ]
    );
}

#[tokio::test]
async fn whitelist_is_grouped_by_dotted_path() {
    let schema = build_schema(&fixture_snapshot().await, &config(&["Invoice"])).unwrap();
    let tree = schema.whitelist_functions();

    let a = tree.module("a").unwrap();
    assert!(matches!(
        a.children.nodes.as_slice(),
        [NamespaceNode::Leaf(e), NamespaceNode::Module(b)] if e.name == "e" && b.name == "b"
    ));

    let b = a.children.module("b").unwrap();
    let c = b.children.leaf("c").unwrap();
    assert!(c.is_public);
    assert_eq!(c.args[0].type_hint.as_deref(), Some("str"));
    assert!(b.children.leaf("d").unwrap().is_public);
    assert_eq!(tree.function_count(), 3);
}

#[tokio::test]
async fn native_fields_win_over_custom_fields() {
    let schema = build_schema(&fixture_snapshot().await, &config(&["Invoice"])).unwrap();
    let invoice = schema.doctype("Invoice").unwrap();

    let amount = invoice.field("amount").unwrap();
    assert_eq!(amount.origin, FieldTypeToken::Currency);
    assert_eq!(amount.nullability, Nullability::NonNullUnlessStrict);
    assert!(amount.required);

    assert!(invoice.field("po_number").is_some());
}

#[tokio::test]
async fn nullability_follows_flags_and_strictness() {
    let snapshot = fixture_snapshot().await;

    let lenient = build_schema(&snapshot, &config(&["Invoice"])).unwrap();
    let invoice = lenient.doctype("Invoice").unwrap();
    assert_eq!(
        invoice.field("posting_date").unwrap().nullability,
        Nullability::NonNullUnlessStrict
    );
    assert_eq!(
        invoice.field("remarks").unwrap().nullability,
        Nullability::NonNullUnlessStrict
    );
    assert!(!invoice.field("remarks").unwrap().required);
    assert_eq!(
        invoice.field("customer").unwrap().nullability,
        Nullability::AlwaysNullable
    );
    assert_eq!(
        lenient
            .doctype("User")
            .unwrap()
            .field("enabled")
            .unwrap()
            .nullability,
        Nullability::AlwaysNonNull
    );

    let strict_config = SchemaConfig::from_toml_str(
        r#"
        doctypes = ["Invoice"]

        [[override]]
        doctype = "Invoice"
        strict-typed = true
        "#,
    )
    .unwrap();
    let strict = build_schema(&snapshot, &strict_config).unwrap();
    let invoice = strict.doctype("Invoice").unwrap();
    assert_eq!(
        invoice.field("posting_date").unwrap().nullability,
        Nullability::AlwaysNonNull
    );
    assert_eq!(
        invoice.field("customer").unwrap().nullability,
        Nullability::AlwaysNullable
    );
    // Strictness is per doctype
    assert_eq!(
        strict
            .doctype("InvoiceItem")
            .unwrap()
            .field("qty")
            .unwrap()
            .nullability,
        Nullability::NonNullUnlessStrict
    );
    assert!(strict.override_for("Invoice").unwrap().strict_typed);
}

#[tokio::test]
async fn single_doctypes_have_no_creation_field() {
    let schema = build_schema(&fixture_snapshot().await, &config(&["Selling Settings"])).unwrap();
    let settings = schema.doctype("Selling Settings").unwrap();

    assert_eq!(settings.kind, DocTypeKind::Single);
    assert!(settings.field("creation").is_none());
    assert!(settings.field("default_territory").is_some());
    assert_eq!(
        names(schema.dummies().iter().map(|d| d.name.as_str())),
        vec!["Territory"]
    );
}

#[tokio::test]
async fn unknown_requested_doctypes_are_all_reported() {
    let result = build_schema(
        &fixture_snapshot().await,
        &config(&["Invoice", "Quotation", "Lead"]),
    );

    match result {
        Err(SchemaBuildingError::MissingTypes { role, names }) => {
            assert_eq!(role, ReferenceRole::Requested);
            assert_eq!(names, vec!["Lead".to_string(), "Quotation".to_string()]);
        }
        other => panic!("Expected missing types, got {other:?}"),
    }
}

#[tokio::test]
async fn rebuilding_from_generated_names_is_stable() {
    let snapshot = fixture_snapshot().await;
    let first = build_schema(&snapshot, &config(&["Invoice"])).unwrap();

    let regenerated: Vec<&str> = first.generated().iter().map(|d| d.name.as_str()).collect();
    let second = build_schema(&snapshot, &config(&regenerated)).unwrap();

    assert_eq!(second.generated(), first.generated());
    assert!(
        second
            .dummies()
            .iter()
            .all(|dummy| first.dummies().contains(dummy))
    );
}

#[tokio::test]
async fn every_reference_is_resolvable() {
    let snapshot = fixture_snapshot().await;

    for roots in [
        vec!["Invoice"],
        vec!["Customer", "Selling Settings"],
        vec!["InvoiceItem"],
    ] {
        let schema = build_schema(&snapshot, &config(&roots)).unwrap();
        schema.validate().unwrap();

        for doctype in schema.generated() {
            for target in doctype.link_targets().chain(doctype.table_targets()) {
                assert!(
                    schema.doctype(target).is_some() || schema.dummy(target).is_some(),
                    "{}: '{target}' is not covered",
                    doctype.name
                );
            }
        }
    }
}

#[tokio::test]
async fn persisted_snapshot_is_deterministic() {
    let snapshot = fixture_snapshot().await;
    let config = config(&["Invoice", "Customer"]);

    let first = build_schema(&snapshot, &config).unwrap();
    let second = build_schema(&snapshot, &config).unwrap();

    let bytes = first.serialize().unwrap();
    assert_eq!(bytes, second.serialize().unwrap());

    let restored = <Schema as SchemaSerializer>::deserialize(&bytes).unwrap();
    assert_eq!(restored, first);
    assert_eq!(restored.serialize().unwrap(), bytes);
}
