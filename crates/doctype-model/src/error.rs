// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaSerializationError {
    #[error("Unable to serialize schema: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Unable to deserialize schema: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("{0}")]
    Header(String),

    #[error("{0}")]
    IO(#[from] std::io::Error),
}

/// A `Link`/`Table` target that is neither generated nor stubbed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub doctype: String,
    pub field: String,
    pub target: String,
}

impl Display for DanglingReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} -> '{}'", self.doctype, self.field, self.target)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSchemaError {
    #[error("Unresolved references: {}", join(.0))]
    DanglingReferences(Vec<DanglingReference>),

    #[error("Doctype '{0}' appears more than once")]
    DuplicateDocType(String),

    #[error("Doctype '{0}' is both generated and a dummy")]
    GeneratedAndDummy(String),

    /// Fields must be strictly ascending by name; `field` is the first one out of place
    #[error("Field '{field}' of doctype '{doctype}' is out of order or repeated")]
    UnorderedField { doctype: String, field: String },
}

fn join(references: &[DanglingReference]) -> String {
    references
        .iter()
        .map(|reference| reference.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
