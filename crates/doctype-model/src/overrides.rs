// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// Per-doctype adjustments supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypeOverride {
    pub doctype: String,
    /// Turn lenient non-null fields into hard non-null ones
    pub strict_typed: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignored_fields: BTreeMap<Operation, BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub ignored_endpoints: BTreeSet<String>,
}

impl DocTypeOverride {
    pub fn new(doctype: impl Into<String>) -> Self {
        DocTypeOverride {
            doctype: doctype.into(),
            strict_typed: false,
            ignored_fields: BTreeMap::new(),
            ignored_endpoints: BTreeSet::new(),
        }
    }

    pub fn is_field_ignored(&self, operation: Operation, field_name: &str) -> bool {
        self.ignored_fields
            .get(&operation)
            .is_some_and(|fields| fields.contains(field_name))
    }
}
