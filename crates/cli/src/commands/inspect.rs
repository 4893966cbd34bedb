// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{fmt::Write, fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{ArgMatches, Command};
use colored::Colorize;
use doctype_model::{
    schema::Schema,
    serializer::SchemaSerializer,
    whitelist::{FunctionLeaf, NamespaceNode, NamespaceTree},
};

use super::command::{CommandDefinition, get_required, snapshot_arg};

pub(crate) struct InspectCommandDefinition {}

#[async_trait]
impl CommandDefinition for InspectCommandDefinition {
    fn command(&self) -> Command {
        Command::new("inspect")
            .about("Validate a schema snapshot and print a summary")
            .arg(snapshot_arg())
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let path: PathBuf = get_required(matches, "snapshot")?;

        let file = File::open(&path)
            .with_context(|| format!("Failed to open '{}'", path.display()))?;
        let schema = <Schema as SchemaSerializer>::deserialize_reader(BufReader::new(file))
            .with_context(|| format!("Invalid schema snapshot '{}'", path.display()))?;

        print!("{}", summary(&schema)?);
        Ok(())
    }
}

fn summary(schema: &Schema) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(
        out,
        "{} ({})",
        "Generated doctypes".bold(),
        schema.generated().len()
    )?;
    for doctype in schema.generated() {
        let strict = schema
            .override_for(&doctype.name)
            .is_some_and(|o| o.strict_typed);
        writeln!(
            out,
            "  {} [{}, {} fields{}]",
            doctype.name,
            doctype.kind,
            doctype.fields.len(),
            if strict { ", strict" } else { "" }
        )?;
    }

    writeln!(
        out,
        "{} ({})",
        "Dummy doctypes".bold(),
        schema.dummies().len()
    )?;
    for dummy in schema.dummies() {
        writeln!(out, "  {} [{}]", dummy.name, dummy.kind)?;
    }

    let functions = schema.whitelist_functions();
    writeln!(
        out,
        "{} ({})",
        "Whitelisted functions".bold(),
        functions.function_count()
    )?;
    write_tree(&mut out, functions, 1)?;

    Ok(out)
}

fn write_tree(out: &mut String, tree: &NamespaceTree, depth: usize) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    for node in &tree.nodes {
        match node {
            NamespaceNode::Leaf(leaf) => writeln!(out, "{indent}{}", signature(leaf))?,
            NamespaceNode::Module(module) => {
                writeln!(out, "{indent}{}", module.name.cyan())?;
                write_tree(out, &module.children, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn signature(leaf: &FunctionLeaf) -> String {
    let args = leaf
        .args
        .iter()
        .map(|arg| match &arg.type_hint {
            Some(type_hint) => format!("{}: {}", arg.name, type_hint),
            None => arg.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let visibility = if leaf.is_public { " (public)" } else { "" };
    format!("{}({}){}", leaf.name, args, visibility)
}
