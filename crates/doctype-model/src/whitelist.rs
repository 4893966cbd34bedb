// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

/// A server function callable over the API, such as `frappe.client.get_count`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistFunction {
    pub dotted_name: String,
    #[serde(default)]
    pub args: Vec<FunctionArg>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionArg {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// Functions grouped by dotted path. Leaves come first (by name), then modules (by name).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamespaceTree {
    pub nodes: Vec<NamespaceNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum NamespaceNode {
    Leaf(FunctionLeaf),
    Module(FunctionModule),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionLeaf {
    pub name: String,
    pub is_public: bool,
    pub args: Vec<FunctionArg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionModule {
    pub name: String,
    pub children: NamespaceTree,
}

impl NamespaceTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &FunctionLeaf> {
        self.nodes.iter().filter_map(|node| match node {
            NamespaceNode::Leaf(leaf) => Some(leaf),
            NamespaceNode::Module(_) => None,
        })
    }

    pub fn modules(&self) -> impl Iterator<Item = &FunctionModule> {
        self.nodes.iter().filter_map(|node| match node {
            NamespaceNode::Module(module) => Some(module),
            NamespaceNode::Leaf(_) => None,
        })
    }

    pub fn module(&self, name: &str) -> Option<&FunctionModule> {
        self.modules().find(|module| module.name == name)
    }

    pub fn leaf(&self, name: &str) -> Option<&FunctionLeaf> {
        self.leaves().find(|leaf| leaf.name == name)
    }

    /// Number of functions in this tree and all nested modules
    pub fn function_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                NamespaceNode::Leaf(_) => 1,
                NamespaceNode::Module(module) => module.children.function_count(),
            })
            .sum()
    }
}
