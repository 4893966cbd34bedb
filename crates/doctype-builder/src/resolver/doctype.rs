// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Assemble one resolved doctype from its raw descriptor and raw fields.
//!
//! The server adds a handful of bookkeeping fields to every document (`name`, `owner`,
//! `modified`, ...) that are not part of the reported field list. They are injected here ahead
//! of the raw fields, so a raw field that reuses one of those names never replaces it.

use std::collections::HashSet;

use doctype_model::{
    doctype::{
        DocTypeKind, FieldKind, Nullability, PrimitiveKind, ResolvedDocType, ResolvedField,
    },
    overrides::DocTypeOverride,
    raw::{RawDocType, RawField},
    token::FieldTypeToken,
};
use tracing::{debug, warn};

use super::field_type::map_field;
use crate::error::SchemaBuildingError;

/// Names the server manages itself. A raw field with one of these names is never kept, even on
/// a single where `creation` is not injected.
pub const SYSTEM_FIELD_NAMES: [&str; 7] = [
    "name",
    "owner",
    "creation",
    "modified",
    "modified_by",
    "docstatus",
    "idx",
];

/// Fields present on every document, in injection order. `creation` is absent from singles.
pub fn system_fields(kind: DocTypeKind) -> Vec<ResolvedField> {
    let system_field = |name: &str, kind: FieldKind, origin: FieldTypeToken| ResolvedField {
        name: name.to_string(),
        kind,
        nullability: Nullability::AlwaysNonNull,
        required: true,
        origin,
    };

    let string = || FieldKind::primitive(PrimitiveKind::String);
    let date_time = || FieldKind::primitive(PrimitiveKind::DateTime);

    let mut fields = vec![
        system_field("name", string(), FieldTypeToken::Data),
        system_field("owner", string(), FieldTypeToken::Data),
    ];
    if kind != DocTypeKind::Single {
        fields.push(system_field("creation", date_time(), FieldTypeToken::DateTime));
    }
    fields.extend([
        system_field("modified", date_time(), FieldTypeToken::DateTime),
        system_field("modified_by", string(), FieldTypeToken::Data),
        system_field("docstatus", FieldKind::DocStatus, FieldTypeToken::Int),
        system_field(
            "idx",
            FieldKind::primitive(PrimitiveKind::Int),
            FieldTypeToken::Int,
        ),
    ]);
    fields
}

/// Build the resolved doctype.
///
/// `fields` are taken in order; on a name collision the first occurrence is kept. A field without
/// an explicit `not_nullable` override uses its `reqd` flag instead.
pub fn resolve_doctype<'a>(
    raw: &RawDocType,
    fields: impl IntoIterator<Item = &'a RawField>,
    doctype_override: Option<&DocTypeOverride>,
) -> Result<ResolvedDocType, SchemaBuildingError> {
    let kind = raw
        .kind()
        .ok_or_else(|| SchemaBuildingError::InvalidDocTypeKind(vec![raw.name.clone()]))?;
    let strict_typed = doctype_override.is_some_and(|o| o.strict_typed);

    let mapped_fields = fields
        .into_iter()
        .filter(|field| {
            let reserved = SYSTEM_FIELD_NAMES.contains(&field.fieldname.as_str());
            if reserved {
                debug!(
                    doctype = %raw.name,
                    field = %field.fieldname,
                    "Field shadows a system field; keeping the system field"
                );
            }
            !reserved
        })
        .filter_map(|field| {
            map_field(
                &field.fieldname,
                &field.fieldtype,
                field.options.as_deref(),
                field.reqd,
                Some(field.not_nullable.unwrap_or(field.reqd)),
                strict_typed,
            )
        });

    let mut seen = HashSet::new();
    let mut resolved_fields: Vec<ResolvedField> = system_fields(kind)
        .into_iter()
        .chain(mapped_fields)
        .filter(|field| {
            let first = seen.insert(field.name.clone());
            if !first {
                warn!(
                    doctype = %raw.name,
                    field = %field.name,
                    "Field is defined more than once; keeping the first definition"
                );
            }
            first
        })
        .collect();

    resolved_fields.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ResolvedDocType {
        module: raw.module.clone(),
        name: raw.name.clone(),
        kind,
        fields: resolved_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::{SYSTEM_FIELD_NAMES, resolve_doctype, system_fields};
    use crate::error::SchemaBuildingError;
    use doctype_model::{
        doctype::{DocTypeKind, FieldKind, Nullability, PrimitiveKind, ResolvedDocType},
        overrides::DocTypeOverride,
        raw::{RawDocType, RawField},
        token::{FieldTypeToken, RawFieldType},
    };
    use multiplatform_test::multiplatform_test;

    fn raw_doctype(name: &str, issingle: bool, istable: bool) -> RawDocType {
        RawDocType {
            name: name.to_string(),
            module: Some("Accounts".to_string()),
            issingle,
            istable,
        }
    }

    fn raw_field(name: &str, token: FieldTypeToken, reqd: bool, options: Option<&str>) -> RawField {
        RawField {
            parent: "Sales Invoice".to_string(),
            fieldname: name.to_string(),
            label: None,
            fieldtype: RawFieldType::Known(token),
            reqd,
            not_nullable: None,
            options: options.map(str::to_string),
        }
    }

    fn resolve(
        raw: &RawDocType,
        fields: &[RawField],
        doctype_override: Option<&DocTypeOverride>,
    ) -> ResolvedDocType {
        resolve_doctype(raw, fields, doctype_override).unwrap()
    }

    fn field_names(doctype: &ResolvedDocType) -> Vec<&str> {
        doctype.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[multiplatform_test]
    fn injects_system_fields() {
        let normal = resolve(&raw_doctype("Sales Invoice", false, false), &[], None);
        assert_eq!(
            field_names(&normal),
            vec![
                "creation",
                "docstatus",
                "idx",
                "modified",
                "modified_by",
                "name",
                "owner"
            ]
        );
        assert!(
            normal
                .fields
                .iter()
                .all(|f| f.nullability == Nullability::AlwaysNonNull)
        );
        assert_eq!(normal.field("docstatus").unwrap().kind, FieldKind::DocStatus);

        let single = resolve(&raw_doctype("Selling Settings", true, false), &[], None);
        assert_eq!(single.kind, DocTypeKind::Single);
        assert!(single.field("creation").is_none());
        assert_eq!(single.fields.len(), 6);

        let child = resolve(&raw_doctype("Sales Invoice Item", false, true), &[], None);
        assert_eq!(child.kind, DocTypeKind::Child);
        assert!(child.field("creation").is_some());
    }

    #[multiplatform_test]
    fn rejects_single_child_tables() {
        let result = resolve_doctype(&raw_doctype("Broken", true, true), &Vec::new(), None);
        assert!(matches!(
            result,
            Err(SchemaBuildingError::InvalidDocTypeKind(names)) if names == vec!["Broken".to_string()]
        ));
    }

    #[multiplatform_test]
    fn system_field_order() {
        let names: Vec<_> = system_fields(DocTypeKind::Normal)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, SYSTEM_FIELD_NAMES);
    }

    #[multiplatform_test]
    fn singles_never_get_a_raw_creation_field() {
        let single = resolve(
            &raw_doctype("Selling Settings", true, false),
            &[
                raw_field("creation", FieldTypeToken::DateTime, false, None),
                raw_field("territory", FieldTypeToken::Link, false, Some("Territory")),
            ],
            None,
        );

        assert!(single.field("creation").is_none());
        assert!(single.field("territory").is_some());
        assert_eq!(single.fields.len(), 7);
    }

    #[multiplatform_test]
    fn system_fields_win_over_raw_fields() {
        let doctype = resolve(
            &raw_doctype("Sales Invoice", false, false),
            &[
                raw_field("owner", FieldTypeToken::Link, false, Some("User")),
                raw_field("idx", FieldTypeToken::Data, false, None),
            ],
            None,
        );

        let owner = doctype.field("owner").unwrap();
        assert_eq!(owner.kind, FieldKind::primitive(PrimitiveKind::String));
        assert_eq!(owner.nullability, Nullability::AlwaysNonNull);
        assert_eq!(
            doctype.field("idx").unwrap().kind,
            FieldKind::primitive(PrimitiveKind::Int)
        );
        assert_eq!(doctype.fields.len(), 7);
    }

    #[multiplatform_test]
    fn first_raw_definition_wins() {
        let doctype = resolve(
            &raw_doctype("Sales Invoice", false, false),
            &[
                raw_field("remarks", FieldTypeToken::SmallText, false, None),
                raw_field("remarks", FieldTypeToken::Int, true, None),
            ],
            None,
        );

        let remarks = doctype.field("remarks").unwrap();
        assert_eq!(remarks.origin, FieldTypeToken::SmallText);
    }

    #[multiplatform_test]
    fn drops_unmappable_fields_and_sorts() {
        let doctype = resolve(
            &raw_doctype("Sales Invoice", false, false),
            &[
                raw_field("status", FieldTypeToken::Select, false, Some("")),
                raw_field("section_break_1", FieldTypeToken::SectionBreak, false, None),
                raw_field("customer", FieldTypeToken::Link, false, Some("Customer")),
                raw_field("amount", FieldTypeToken::Currency, true, None),
            ],
            None,
        );

        assert!(doctype.field("status").is_none());
        assert!(doctype.field("section_break_1").is_none());
        assert_eq!(
            field_names(&doctype),
            vec![
                "amount",
                "creation",
                "customer",
                "docstatus",
                "idx",
                "modified",
                "modified_by",
                "name",
                "owner"
            ]
        );
    }

    #[multiplatform_test]
    fn required_fields_are_lenient_unless_strict() {
        let raw = raw_doctype("Sales Invoice", false, false);
        let fields = [
            raw_field("amount", FieldTypeToken::Currency, true, None),
            raw_field("remarks", FieldTypeToken::Text, false, None),
        ];

        let lenient = resolve(&raw, &fields, None);
        let amount = lenient.field("amount").unwrap();
        assert_eq!(amount.nullability, Nullability::NonNullUnlessStrict);
        assert!(amount.required);
        assert_eq!(
            lenient.field("remarks").unwrap().nullability,
            Nullability::AlwaysNullable
        );

        let strict_override = DocTypeOverride {
            strict_typed: true,
            ..DocTypeOverride::new("Sales Invoice")
        };
        let strict = resolve(&raw, &fields, Some(&strict_override));
        assert_eq!(
            strict.field("amount").unwrap().nullability,
            Nullability::AlwaysNonNull
        );
        assert_eq!(
            strict.field("remarks").unwrap().nullability,
            Nullability::AlwaysNullable
        );
    }

    #[multiplatform_test]
    fn explicit_override_beats_reqd() {
        let mut field = raw_field("amount", FieldTypeToken::Currency, true, None);
        field.not_nullable = Some(false);

        let doctype = resolve(&raw_doctype("Sales Invoice", false, false), &[field], None);
        let amount = doctype.field("amount").unwrap();
        assert_eq!(amount.nullability, Nullability::AlwaysNullable);
        assert!(amount.required);
    }
}
