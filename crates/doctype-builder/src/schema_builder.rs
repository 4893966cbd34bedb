// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeSet, HashMap};

use doctype_model::{
    doctype::ResolvedDocType,
    overrides::DocTypeOverride,
    raw::{RawDocType, RawField},
    schema::Schema,
};
use tracing::{debug, info, warn};

use crate::{
    closure::{DocTypeIndex, resolve_closure},
    config::SchemaConfig,
    error::SchemaBuildingError,
    resolver::resolve_doctype,
    source::{RawSnapshot, RecordSource, collect_snapshot},
    whitelist::build_namespace_tree,
};

/// Collect the raw records from `source` and build the schema
pub async fn build_schema_from_source<S>(
    source: &S,
    config: &SchemaConfig,
) -> Result<Schema, SchemaBuildingError>
where
    S: RecordSource + ?Sized,
{
    let snapshot = collect_snapshot(source).await?;
    build_schema(&snapshot, config)
}

pub fn build_schema(
    snapshot: &RawSnapshot,
    config: &SchemaConfig,
) -> Result<Schema, SchemaBuildingError> {
    let doctypes = unique_doctypes(&snapshot.doctypes)?;
    let fields = fields_by_parent(snapshot, &doctypes);

    let index = doctypes
        .iter()
        .map(|raw| {
            let fields = fields.get(raw.name.as_str()).into_iter().flatten();
            resolve_doctype(raw, fields, config.override_for(&raw.name))
        })
        .collect::<Result<DocTypeIndex, _>>()?;

    let closure = resolve_closure(config.requested(), &index)?;
    let whitelist_functions = build_namespace_tree(&snapshot.whitelist_functions)?;
    let overrides = generated_overrides(config, &closure.generated);

    let schema = Schema::new(
        closure.generated,
        closure.dummies,
        whitelist_functions,
        overrides,
    )?;

    info!(
        generated = schema.generated().len(),
        dummies = schema.dummies().len(),
        whitelist_functions = schema.whitelist_functions().function_count(),
        "Built schema"
    );

    Ok(schema)
}

// Rejects every doctype that is both single and a child table, and keeps the first of any
// repeated name
fn unique_doctypes(raw: &[RawDocType]) -> Result<Vec<&RawDocType>, SchemaBuildingError> {
    let invalid: BTreeSet<&str> = raw
        .iter()
        .filter(|doctype| doctype.kind().is_none())
        .map(|doctype| doctype.name.as_str())
        .collect();
    if !invalid.is_empty() {
        return Err(SchemaBuildingError::InvalidDocTypeKind(
            invalid.into_iter().map(str::to_string).collect(),
        ));
    }

    let mut seen = BTreeSet::new();
    Ok(raw
        .iter()
        .filter(|doctype| {
            let first = seen.insert(doctype.name.as_str());
            if !first {
                warn!(
                    doctype = %doctype.name,
                    "Doctype is reported more than once; keeping the first"
                );
            }
            first
        })
        .collect())
}

// Native fields first, then custom fields, each in source order
fn fields_by_parent(
    snapshot: &RawSnapshot,
    doctypes: &[&RawDocType],
) -> HashMap<String, Vec<RawField>> {
    let known: BTreeSet<&str> = doctypes.iter().map(|doctype| doctype.name.as_str()).collect();

    let native = snapshot.fields.iter().cloned();
    let custom = snapshot.custom_fields.iter().cloned().map(RawField::from);

    let mut fields: HashMap<String, Vec<RawField>> = HashMap::new();
    for field in native.chain(custom) {
        if known.contains(field.parent.as_str()) {
            fields.entry(field.parent.clone()).or_default().push(field);
        } else {
            debug!(
                doctype = %field.parent,
                field = %field.fieldname,
                "Ignoring field of an unknown doctype"
            );
        }
    }
    fields
}

fn generated_overrides(
    config: &SchemaConfig,
    generated: &[ResolvedDocType],
) -> Vec<DocTypeOverride> {
    config
        .overrides()
        .filter(|doctype_override| {
            let is_generated = generated
                .iter()
                .any(|doctype| doctype.name == doctype_override.doctype);
            if !is_generated {
                debug!(
                    doctype = %doctype_override.doctype,
                    "Dropping override for a doctype that is not generated"
                );
            }
            is_generated
        })
        .cloned()
        .collect()
}
