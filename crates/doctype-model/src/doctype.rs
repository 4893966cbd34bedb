// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::token::FieldTypeToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocTypeKind {
    Normal,
    /// Exactly one instance; no `creation` timestamp
    Single,
    /// Only exists as rows of a parent's `Table` field
    Child,
}

impl Display for DocTypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DocTypeKind::Normal => "normal",
            DocTypeKind::Single => "single",
            DocTypeKind::Child => "child",
        })
    }
}

/// How a field's absence is treated.
///
/// `NonNullUnlessStrict` is the lenient middle ground: the server marks the field as required
/// but does not reliably enforce it. Such a field has no default at construction sites (callers
/// must supply it) and is still read back as nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    AlwaysNullable,
    NonNullUnlessStrict,
    AlwaysNonNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    String,
    Int,
    Double,
    Date,
    DateTime,
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    #[serde(rename = "primitive")]
    Primitive { primitive: PrimitiveKind },
    #[serde(rename = "attach")]
    Attach,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "select")]
    Select { options: BTreeSet<String> },
    #[serde(rename = "link")]
    Link { target: String },
    #[serde(rename = "table")]
    Table { target: String },
    /// The target doctype is chosen at runtime by the value of `option_field`. It is not resolved.
    #[serde(rename = "dynamic_link")]
    DynamicLink { option_field: String },
    #[serde(rename = "docstatus")]
    DocStatus,
}

impl FieldKind {
    /// Tag used for this variant in the persisted schema
    pub fn wire_key(&self) -> &'static str {
        match self {
            FieldKind::Primitive { .. } => "primitive",
            FieldKind::Attach => "attach",
            FieldKind::Check => "check",
            FieldKind::Select { .. } => "select",
            FieldKind::Link { .. } => "link",
            FieldKind::Table { .. } => "table",
            FieldKind::DynamicLink { .. } => "dynamic_link",
            FieldKind::DocStatus => "docstatus",
        }
    }

    pub fn primitive(primitive: PrimitiveKind) -> Self {
        FieldKind::Primitive { primitive }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub nullability: Nullability,
    pub required: bool,
    pub origin: FieldTypeToken,
}

impl ResolvedField {
    /// Whether a constructor may omit this field
    pub fn has_construction_default(&self) -> bool {
        matches!(self.nullability, Nullability::AlwaysNullable)
    }

    /// Whether a value read back from the server may be missing
    pub fn is_nullable_on_read(&self) -> bool {
        !matches!(self.nullability, Nullability::AlwaysNonNull)
    }

    pub fn link_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Link { target } => Some(target),
            _ => None,
        }
    }

    pub fn table_target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Table { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDocType {
    pub module: Option<String>,
    pub name: String,
    pub kind: DocTypeKind,
    /// Sorted by name, names unique
    pub fields: Vec<ResolvedField>,
}

impl ResolvedDocType {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields
            .binary_search_by(|field| field.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.fields[index])
    }

    pub fn link_targets(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(ResolvedField::link_target)
    }

    pub fn table_targets(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(ResolvedField::table_target)
    }

    pub fn as_dummy(&self) -> DummyDocType {
        DummyDocType {
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

/// A fieldless stand-in for a doctype that is only linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DummyDocType {
    pub name: String,
    pub kind: DocTypeKind,
}
