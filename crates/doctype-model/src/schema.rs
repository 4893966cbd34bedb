// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    doctype::{DummyDocType, ResolvedDocType},
    error::{DanglingReference, InvalidSchemaError},
    overrides::DocTypeOverride,
    whitelist::NamespaceTree,
};

/// The resolved, reference-complete schema.
///
/// Every `Link` or `Table` target of a generated doctype is either generated itself or present
/// as a dummy. The constructor and the deserializer both enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSchema")]
pub struct Schema {
    generated: Vec<ResolvedDocType>,
    dummies: Vec<DummyDocType>,
    whitelist_functions: NamespaceTree,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    overrides: Vec<DocTypeOverride>,
}

#[derive(Deserialize)]
struct UncheckedSchema {
    generated: Vec<ResolvedDocType>,
    dummies: Vec<DummyDocType>,
    whitelist_functions: NamespaceTree,
    #[serde(default)]
    overrides: Vec<DocTypeOverride>,
}

impl TryFrom<UncheckedSchema> for Schema {
    type Error = InvalidSchemaError;

    fn try_from(unchecked: UncheckedSchema) -> Result<Self, Self::Error> {
        Schema::new(
            unchecked.generated,
            unchecked.dummies,
            unchecked.whitelist_functions,
            unchecked.overrides,
        )
    }
}

impl Schema {
    /// Assemble a schema. Doctypes, dummies and overrides are put in name order.
    pub fn new(
        mut generated: Vec<ResolvedDocType>,
        mut dummies: Vec<DummyDocType>,
        whitelist_functions: NamespaceTree,
        mut overrides: Vec<DocTypeOverride>,
    ) -> Result<Self, InvalidSchemaError> {
        generated.sort_by(|a, b| a.name.cmp(&b.name));
        dummies.sort_by(|a, b| a.name.cmp(&b.name));
        overrides.sort_by(|a, b| a.doctype.cmp(&b.doctype));

        let schema = Schema {
            generated,
            dummies,
            whitelist_functions,
            overrides,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn generated(&self) -> &[ResolvedDocType] {
        &self.generated
    }

    pub fn dummies(&self) -> &[DummyDocType] {
        &self.dummies
    }

    pub fn whitelist_functions(&self) -> &NamespaceTree {
        &self.whitelist_functions
    }

    pub fn overrides(&self) -> &[DocTypeOverride] {
        &self.overrides
    }

    pub fn doctype(&self, name: &str) -> Option<&ResolvedDocType> {
        self.generated
            .binary_search_by(|doctype| doctype.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.generated[index])
    }

    pub fn dummy(&self, name: &str) -> Option<&DummyDocType> {
        self.dummies
            .binary_search_by(|dummy| dummy.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.dummies[index])
    }

    pub fn override_for(&self, name: &str) -> Option<&DocTypeOverride> {
        self.overrides
            .iter()
            .find(|override_| override_.doctype == name)
    }

    /// Check the closure invariant: no doctype is listed twice, every doctype's fields are
    /// unique and in name order, and every reference resolves.
    pub fn validate(&self) -> Result<(), InvalidSchemaError> {
        let mut generated_names = HashSet::new();
        for doctype in &self.generated {
            if !generated_names.insert(doctype.name.as_str()) {
                return Err(InvalidSchemaError::DuplicateDocType(doctype.name.clone()));
            }
            if let Some(pair) = doctype
                .fields
                .windows(2)
                .find(|pair| pair[0].name >= pair[1].name)
            {
                return Err(InvalidSchemaError::UnorderedField {
                    doctype: doctype.name.clone(),
                    field: pair[1].name.clone(),
                });
            }
        }

        let mut dummy_names = HashSet::new();
        for dummy in &self.dummies {
            if generated_names.contains(dummy.name.as_str()) {
                return Err(InvalidSchemaError::GeneratedAndDummy(dummy.name.clone()));
            }
            if !dummy_names.insert(dummy.name.as_str()) {
                return Err(InvalidSchemaError::DuplicateDocType(dummy.name.clone()));
            }
        }

        let (generated_names, dummy_names) = (&generated_names, &dummy_names);
        let dangling: Vec<_> = self
            .generated
            .iter()
            .flat_map(|doctype| {
                doctype.fields.iter().filter_map(move |field| {
                    let target = field.link_target().or_else(|| field.table_target())?;
                    let known = generated_names.contains(target) || dummy_names.contains(target);
                    (!known).then(|| DanglingReference {
                        doctype: doctype.name.clone(),
                        field: field.name.clone(),
                        target: target.to_string(),
                    })
                })
            })
            .collect();

        if dangling.is_empty() {
            Ok(())
        } else {
            Err(InvalidSchemaError::DanglingReferences(dangling))
        }
    }
}
