// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Raw records as the server reports them.
//!
//! Key names are the server's own (`issingle`, `fieldname`, `reqd`, `dt`, ...) and must not be
//! renamed. Boolean flags travel as `0`/`1`; `true`/`false` is accepted as well.

use serde::{Deserialize, Serialize};

use crate::{doctype::DocTypeKind, token::RawFieldType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocType {
    pub name: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(with = "flag", default)]
    pub issingle: bool,
    #[serde(with = "flag", default)]
    pub istable: bool,
}

impl RawDocType {
    /// The kind implied by `issingle`/`istable`. `None` when both are set.
    pub fn kind(&self) -> Option<DocTypeKind> {
        match (self.issingle, self.istable) {
            (false, false) => Some(DocTypeKind::Normal),
            (true, false) => Some(DocTypeKind::Single),
            (false, true) => Some(DocTypeKind::Child),
            (true, true) => None,
        }
    }
}

/// A field defined by the doctype itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    pub parent: String,
    pub fieldname: String,
    #[serde(default)]
    pub label: Option<String>,
    pub fieldtype: RawFieldType,
    #[serde(with = "flag", default)]
    pub reqd: bool,
    #[serde(with = "optional_flag", default, skip_serializing_if = "Option::is_none")]
    pub not_nullable: Option<bool>,
    #[serde(default)]
    pub options: Option<String>,
}

/// A "Custom Field" overlay record. Same semantics as [`RawField`], but keyed to its doctype by `dt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCustomField {
    pub dt: String,
    pub fieldname: String,
    #[serde(default)]
    pub label: Option<String>,
    pub fieldtype: RawFieldType,
    #[serde(with = "flag", default)]
    pub reqd: bool,
    #[serde(with = "optional_flag", default, skip_serializing_if = "Option::is_none")]
    pub not_nullable: Option<bool>,
    #[serde(default)]
    pub options: Option<String>,
}

impl From<RawCustomField> for RawField {
    fn from(custom: RawCustomField) -> Self {
        RawField {
            parent: custom.dt,
            fieldname: custom.fieldname,
            label: custom.label,
            fieldtype: custom.fieldtype,
            reqd: custom.reqd,
            not_nullable: custom.not_nullable,
            options: custom.options,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireFlag {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl WireFlag {
    fn into_bool<E: serde::de::Error>(self) -> Result<bool, E> {
        match self {
            WireFlag::Bool(b) => Ok(b),
            WireFlag::Int(0) => Ok(false),
            WireFlag::Int(1) => Ok(true),
            WireFlag::Int(other) => Err(E::custom(format!("expected 0 or 1, found {other}"))),
            WireFlag::Str(s) => match s.trim() {
                "0" | "" => Ok(false),
                "1" => Ok(true),
                other => Err(E::custom(format!("expected \"0\" or \"1\", found \"{other}\""))),
            },
        }
    }
}

mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::WireFlag;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        WireFlag::deserialize(deserializer)?.into_bool()
    }
}

mod optional_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::WireFlag;

    pub fn serialize<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_u8(u8::from(*value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<bool>, D::Error> {
        Option::<WireFlag>::deserialize(deserializer)?
            .map(WireFlag::into_bool)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::{RawCustomField, RawDocType, RawField};
    use crate::{
        doctype::DocTypeKind,
        token::{FieldTypeToken, RawFieldType},
    };
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn doctype_kind_from_flags() {
        let doctype: RawDocType = serde_json::from_str(
            r#"{"name": "System Settings", "module": "Core", "issingle": 1, "istable": 0}"#,
        )
        .unwrap();
        assert_eq!(doctype.kind(), Some(DocTypeKind::Single));

        let doctype: RawDocType =
            serde_json::from_str(r#"{"name": "Sales Invoice Item", "istable": true}"#).unwrap();
        assert_eq!(doctype.kind(), Some(DocTypeKind::Child));
        assert_eq!(doctype.module, None);

        let doctype: RawDocType =
            serde_json::from_str(r#"{"name": "Broken", "issingle": 1, "istable": 1}"#).unwrap();
        assert_eq!(doctype.kind(), None);
    }

    #[multiplatform_test]
    fn rejects_non_binary_flags() {
        let result = serde_json::from_str::<RawDocType>(r#"{"name": "Broken", "issingle": 2}"#);
        assert!(result.is_err());
    }

    #[multiplatform_test]
    fn custom_field_becomes_field() {
        let custom: RawCustomField = serde_json::from_str(
            r#"{"dt": "Customer", "fieldname": "loyalty_tier", "fieldtype": "Select", "reqd": 0, "options": "Gold\nSilver"}"#,
        )
        .unwrap();
        let field = RawField::from(custom);

        assert_eq!(field.parent, "Customer");
        assert_eq!(field.fieldtype, RawFieldType::Known(FieldTypeToken::Select));
        assert!(!field.reqd);
        assert_eq!(field.not_nullable, None);
        assert_eq!(field.options.as_deref(), Some("Gold\nSilver"));
    }

    #[multiplatform_test]
    fn not_nullable_override_is_optional() {
        let field: RawField = serde_json::from_str(
            r#"{"parent": "Customer", "fieldname": "customer_name", "fieldtype": "Data", "reqd": 1, "not_nullable": 0}"#,
        )
        .unwrap();
        assert!(field.reqd);
        assert_eq!(field.not_nullable, Some(false));
    }
}
