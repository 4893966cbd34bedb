// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! An arena of resolved doctypes with lookup by name.
//!
//! The closure pass looks names up far more often than it inserts, and every lookup comes from a
//! field target, so the index keeps a name map next to the arena instead of scanning.

use std::collections::{BTreeMap, HashMap};

use doctype_model::doctype::ResolvedDocType;
use typed_generational_arena::{Arena, IgnoreGeneration, Index};

pub type DocTypeSlab = Arena<ResolvedDocType, usize, IgnoreGeneration>;
pub type DocTypeId = Index<ResolvedDocType, usize, IgnoreGeneration>;

/// Everything a closure may draw from
pub trait TypeUniverse {
    fn lookup(&self, name: &str) -> Option<&ResolvedDocType>;
}

#[derive(Debug, Clone)]
pub struct DocTypeIndex {
    values: DocTypeSlab,
    by_name: HashMap<String, DocTypeId>,
}

impl DocTypeIndex {
    /// Add a doctype. If the name is already taken the existing entry is kept and the new doctype
    /// is handed back.
    pub fn insert(&mut self, doctype: ResolvedDocType) -> Result<DocTypeId, ResolvedDocType> {
        if self.by_name.contains_key(&doctype.name) {
            return Err(doctype);
        }

        let name = doctype.name.clone();
        let id = self.values.insert(doctype);
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn get_id(&self, name: &str) -> Option<DocTypeId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: DocTypeId) -> Option<&ResolvedDocType> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedDocType> {
        self.values.iter().map(|(_, doctype)| doctype)
    }
}

impl Default for DocTypeIndex {
    fn default() -> Self {
        DocTypeIndex {
            values: DocTypeSlab::new(),
            by_name: HashMap::new(),
        }
    }
}

impl FromIterator<ResolvedDocType> for DocTypeIndex {
    fn from_iter<T: IntoIterator<Item = ResolvedDocType>>(iter: T) -> Self {
        let mut index = DocTypeIndex::default();
        for doctype in iter {
            let _ = index.insert(doctype);
        }
        index
    }
}

impl TypeUniverse for DocTypeIndex {
    fn lookup(&self, name: &str) -> Option<&ResolvedDocType> {
        self.get_id(name).and_then(|id| self.get(id))
    }
}

impl TypeUniverse for HashMap<String, ResolvedDocType> {
    fn lookup(&self, name: &str) -> Option<&ResolvedDocType> {
        self.get(name)
    }
}

impl TypeUniverse for BTreeMap<String, ResolvedDocType> {
    fn lookup(&self, name: &str) -> Option<&ResolvedDocType> {
        self.get(name)
    }
}
