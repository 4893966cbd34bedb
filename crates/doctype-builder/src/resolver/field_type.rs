// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Map a raw `fieldtype` to a resolved field.
//!
//! Some fields are intentionally dropped rather than reported: layout-only tokens (breaks,
//! headings, buttons), `Table MultiSelect`, unknown tags, and `Select`/`Link`/`Table`/`Dynamic
//! Link` fields whose `options` are unusable. Dropping shrinks the schema but is not an error.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

use doctype_model::{
    doctype::{FieldKind, Nullability, PrimitiveKind, ResolvedField},
    token::{FieldTypeToken, RawFieldType},
};
use tracing::debug;

use super::nullability::resolve_nullability;

/// Why a field did not make it into the resolved doctype
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    LayoutOnly(FieldTypeToken),
    Unsupported(RawFieldType),
    NoSelectOptions,
    NoTarget(FieldTypeToken),
}

impl Display for DropReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::LayoutOnly(token) => write!(f, "'{token}' is a layout element"),
            DropReason::Unsupported(fieldtype) => write!(f, "'{fieldtype}' is not supported"),
            DropReason::NoSelectOptions => f.write_str("select field has no options"),
            DropReason::NoTarget(token) => write!(f, "'{token}' field has no target in options"),
        }
    }
}

enum NullabilityRule {
    FromFlags,
    Forced(Nullability),
}

/// Map one raw field. `None` means the field is dropped.
///
/// `not_nullable` is the raw non-null override; when absent the field is `AlwaysNullable`.
/// `Int` and `Check` fields are always non-null whatever the flags say.
pub fn map_field(
    field_name: &str,
    fieldtype: &RawFieldType,
    options: Option<&str>,
    required: bool,
    not_nullable: Option<bool>,
    strict_typed: bool,
) -> Option<ResolvedField> {
    match try_map_field(field_name, fieldtype, options, required, not_nullable, strict_typed) {
        Ok(field) => Some(field),
        Err(reason) => {
            debug!(field = field_name, %reason, "Dropping field");
            None
        }
    }
}

pub fn try_map_field(
    field_name: &str,
    fieldtype: &RawFieldType,
    options: Option<&str>,
    required: bool,
    not_nullable: Option<bool>,
    strict_typed: bool,
) -> Result<ResolvedField, DropReason> {
    let token = match fieldtype {
        RawFieldType::Known(token) => *token,
        RawFieldType::Unsupported(_) => return Err(DropReason::Unsupported(fieldtype.clone())),
    };

    let (kind, rule) = map_token(token, options)?;

    let nullability = match rule {
        NullabilityRule::Forced(nullability) => nullability,
        NullabilityRule::FromFlags => match not_nullable {
            None => Nullability::AlwaysNullable,
            Some(not_nullable) => resolve_nullability(!not_nullable, strict_typed),
        },
    };

    Ok(ResolvedField {
        name: field_name.to_string(),
        kind,
        nullability,
        required,
        origin: token,
    })
}

fn map_token(
    token: FieldTypeToken,
    options: Option<&str>,
) -> Result<(FieldKind, NullabilityRule), DropReason> {
    use FieldTypeToken::*;

    let plain = |kind| Ok((kind, NullabilityRule::FromFlags));

    match token {
        Data | Barcode | Code | Color | Signature | SmallText | LongText | Text | Autocomplete
        | Json | ReadOnly | Geolocation | TextEditor | HtmlEditor | MarkdownEditor | Html
        | Icon | Password => plain(FieldKind::primitive(PrimitiveKind::String)),

        Attach | AttachImage => plain(FieldKind::Attach),

        DateTime => plain(FieldKind::primitive(PrimitiveKind::DateTime)),
        Date => plain(FieldKind::primitive(PrimitiveKind::Date)),
        Time => plain(FieldKind::primitive(PrimitiveKind::Time)),

        Currency | Float | Duration | Percent | Rating => {
            plain(FieldKind::primitive(PrimitiveKind::Double))
        }

        Int => Ok((
            FieldKind::primitive(PrimitiveKind::Int),
            NullabilityRule::Forced(Nullability::AlwaysNonNull),
        )),
        Check => Ok((
            FieldKind::Check,
            NullabilityRule::Forced(Nullability::AlwaysNonNull),
        )),

        Select => {
            let options = select_options(options);
            if options.is_empty() {
                Err(DropReason::NoSelectOptions)
            } else {
                plain(FieldKind::Select { options })
            }
        }
        Link => plain(FieldKind::Link {
            target: target(token, options)?,
        }),
        Table => plain(FieldKind::Table {
            target: target(token, options)?,
        }),
        DynamicLink => plain(FieldKind::DynamicLink {
            option_field: target(token, options)?,
        }),

        Button | Heading | ColumnBreak | SectionBreak | TabBreak | Note | Image => {
            Err(DropReason::LayoutOnly(token))
        }
        TableMultiSelect => Err(DropReason::Unsupported(RawFieldType::Known(token))),
    }
}

/// Newline-separated values, trimmed, blanks dropped, duplicates collapsed
pub fn select_options(options: Option<&str>) -> BTreeSet<String> {
    options
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

// The value is taken literally; only an absent or blank value is rejected
fn target(token: FieldTypeToken, options: Option<&str>) -> Result<String, DropReason> {
    match options {
        Some(options) if !options.trim().is_empty() => Ok(options.to_string()),
        _ => Err(DropReason::NoTarget(token)),
    }
}
