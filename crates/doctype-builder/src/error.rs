// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use doctype_model::error::InvalidSchemaError;
use thiserror::Error;

use crate::{config::ConfigError, source::SourceError, util::quoted_list};

/// Why a doctype name had to be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    Requested,
    /// Target of a `Table` field
    Child,
    /// Target of a `Link` field
    Link,
}

impl Display for ReferenceRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReferenceRole::Requested => "requested",
            ReferenceRole::Child => "child table",
            ReferenceRole::Link => "linked",
        })
    }
}

#[derive(Error, Debug)]
pub enum SchemaBuildingError {
    /// Every name that could not be resolved at the failing stage, sorted
    #[error("Unknown {role} doctype(s): {}", quoted_list(.names))]
    MissingTypes {
        role: ReferenceRole,
        names: Vec<String>,
    },

    /// `path` is the dotted module the clash happens in, empty at the top level
    #[error("'{}' is both a whitelisted function and a module", qualified_name(.path, .name))]
    NamespaceCollision { path: String, name: String },

    #[error("Whitelisted function '{0}' is declared more than once with different signatures")]
    ConflictingFunction(String),

    #[error("Invalid whitelisted function name '{0}'")]
    InvalidFunctionName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Doctype(s) marked both single and child table: {}", quoted_list(.0))]
    InvalidDocTypeKind(Vec<String>),

    #[error("Could not collect raw records: {0}")]
    Collection(#[from] SourceError),

    #[error("{0}")]
    InvalidSchema(#[from] InvalidSchemaError),
}

fn qualified_name(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

impl From<ConfigError> for SchemaBuildingError {
    fn from(error: ConfigError) -> Self {
        SchemaBuildingError::InvalidConfiguration(error.to_string())
    }
}
