// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Expand the requested doctypes into a reference-complete set.
//!
//! Requested doctypes and every doctype reachable through `Table` fields are generated in full.
//! Targets of `Link` fields that are not otherwise generated become dummies: the closure stops at
//! that boundary and does not look at the dummy's own fields.

use std::collections::{BTreeMap, BTreeSet};

use doctype_model::doctype::{DummyDocType, ResolvedDocType};
use tracing::debug;

use crate::error::{ReferenceRole, SchemaBuildingError};

mod type_index;

pub use type_index::{DocTypeId, DocTypeIndex, TypeUniverse};

/// Always generated, whatever was requested. Every document's `owner` and `modified_by` refer to it.
pub const ALWAYS_GENERATED: &str = "User";

#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    /// Sorted by name
    pub generated: Vec<ResolvedDocType>,
    /// Sorted by name, disjoint from `generated`
    pub dummies: Vec<DummyDocType>,
}

pub fn resolve_closure<U>(
    requested: &BTreeSet<String>,
    universe: &U,
) -> Result<Closure, SchemaBuildingError>
where
    U: TypeUniverse + ?Sized,
{
    if requested.is_empty() {
        return Err(SchemaBuildingError::InvalidConfiguration(
            "at least one doctype must be requested".to_string(),
        ));
    }

    let roots = requested
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(ALWAYS_GENERATED));

    let mut generated: BTreeMap<&str, &ResolvedDocType> = BTreeMap::new();
    let mut missing: BTreeSet<String> = BTreeSet::new();

    for name in roots {
        match universe.lookup(name) {
            Some(doctype) => {
                generated.insert(doctype.name.as_str(), doctype);
            }
            None => {
                missing.insert(name.to_string());
            }
        }
    }
    check_missing(ReferenceRole::Requested, missing)?;

    let children = collect_children(&mut generated, universe)?;
    debug!(?children, "Resolved child tables");

    let dummies = collect_dummies(&generated, universe)?;

    Ok(Closure {
        generated: generated.into_values().cloned().collect(),
        dummies,
    })
}

// Follows `Table` fields transitively, so that child tables of child tables are generated too
fn collect_children<'u, U>(
    generated: &mut BTreeMap<&'u str, &'u ResolvedDocType>,
    universe: &'u U,
) -> Result<Vec<&'u str>, SchemaBuildingError>
where
    U: TypeUniverse + ?Sized,
{
    let mut pending: Vec<&'u str> = generated
        .values()
        .copied()
        .flat_map(ResolvedDocType::table_targets)
        .collect();
    let mut children = vec![];
    let mut missing = BTreeSet::new();

    while let Some(target) = pending.pop() {
        if generated.contains_key(target) || missing.contains(target) {
            continue;
        }

        match universe.lookup(target) {
            Some(child) => {
                generated.insert(child.name.as_str(), child);
                children.push(child.name.as_str());
                pending.extend(child.table_targets());
            }
            None => {
                missing.insert(target.to_string());
            }
        }
    }
    check_missing(ReferenceRole::Child, missing)?;

    children.sort_unstable();
    Ok(children)
}

fn collect_dummies<U>(
    generated: &BTreeMap<&str, &ResolvedDocType>,
    universe: &U,
) -> Result<Vec<DummyDocType>, SchemaBuildingError>
where
    U: TypeUniverse + ?Sized,
{
    let link_targets: BTreeSet<&str> = generated
        .values()
        .copied()
        .flat_map(ResolvedDocType::link_targets)
        .filter(|target| !generated.contains_key(target))
        .collect();

    let mut dummies = vec![];
    let mut missing = BTreeSet::new();

    for target in link_targets {
        match universe.lookup(target) {
            Some(doctype) => {
                debug!(doctype = target, "Linked doctype becomes a dummy");
                dummies.push(doctype.as_dummy());
            }
            None => {
                missing.insert(target.to_string());
            }
        }
    }
    check_missing(ReferenceRole::Link, missing)?;

    Ok(dummies)
}

fn check_missing(
    role: ReferenceRole,
    missing: BTreeSet<String>,
) -> Result<(), SchemaBuildingError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaBuildingError::MissingTypes {
            role,
            names: missing.into_iter().collect(),
        })
    }
}
