// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Group whitelisted functions into a tree by their dotted path.
//!
//! `frappe.client.get_count` becomes a leaf `get_count` inside module `client` inside module
//! `frappe`. A segment that is used both as a function name and as a module name at the same
//! level cannot be represented and is rejected.

use std::collections::{BTreeMap, BTreeSet};

use doctype_model::whitelist::{
    FunctionLeaf, FunctionModule, NamespaceNode, NamespaceTree, WhitelistFunction,
};

use crate::error::SchemaBuildingError;

/// The part of the dotted name not yet consumed, and its declaration
type Entry<'a> = (&'a str, &'a WhitelistFunction);

pub fn build_namespace_tree<'a>(
    functions: impl IntoIterator<Item = &'a WhitelistFunction>,
) -> Result<NamespaceTree, SchemaBuildingError> {
    // Identical declarations collapse; differing ones with the same name are caught below
    let functions: BTreeSet<&WhitelistFunction> = functions.into_iter().collect();

    let entries = functions
        .into_iter()
        .map(|function| {
            let dotted_name = function.dotted_name.as_str();
            if dotted_name.split('.').any(|segment| segment.trim().is_empty()) {
                Err(SchemaBuildingError::InvalidFunctionName(
                    function.dotted_name.clone(),
                ))
            } else {
                Ok((dotted_name, function))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    build_level(entries, &[])
}

fn build_level<'a>(
    entries: Vec<Entry<'a>>,
    path: &[&'a str],
) -> Result<NamespaceTree, SchemaBuildingError> {
    let mut leaves: BTreeMap<&str, &WhitelistFunction> = BTreeMap::new();
    let mut groups: BTreeMap<&str, Vec<Entry<'a>>> = BTreeMap::new();

    for (remaining, function) in entries {
        match remaining.split_once('.') {
            None => {
                if leaves.insert(remaining, function).is_some() {
                    return Err(SchemaBuildingError::ConflictingFunction(
                        function.dotted_name.clone(),
                    ));
                }
            }
            Some((first, rest)) => groups.entry(first).or_default().push((rest, function)),
        }
    }

    if let Some(name) = leaves.keys().find(|name| groups.contains_key(*name)) {
        return Err(SchemaBuildingError::NamespaceCollision {
            path: path.join("."),
            name: name.to_string(),
        });
    }

    let mut nodes: Vec<NamespaceNode> = leaves
        .into_iter()
        .map(|(name, function)| {
            NamespaceNode::Leaf(FunctionLeaf {
                name: name.to_string(),
                is_public: function.is_public,
                args: function.args.clone(),
            })
        })
        .collect();

    for (name, group) in groups {
        let mut child_path = path.to_vec();
        child_path.push(name);

        nodes.push(NamespaceNode::Module(FunctionModule {
            name: name.to_string(),
            children: build_level(group, &child_path)?,
        }));
    }

    Ok(NamespaceTree { nodes })
}
