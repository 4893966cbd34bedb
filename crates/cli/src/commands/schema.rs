// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use clap::{ArgMatches, Command};
use colored::Colorize;
use doctype_builder::{
    JsonDirectorySource, SchemaConfig, build_schema_from_source, config::DEFAULT_CONFIG_FILE,
};
use doctype_model::{overrides::DocTypeOverride, serializer::SchemaSerializer};

use crate::util::snapshot_writer;

use super::command::{
    CommandDefinition, config_arg, doctype_arg, get, get_required, input_dir_arg, output_arg,
    yes_arg,
};

pub(crate) struct SchemaCommandDefinition {}

#[async_trait]
impl CommandDefinition for SchemaCommandDefinition {
    fn command(&self) -> Command {
        Command::new("schema")
            .about("Resolve the requested doctypes and write the schema snapshot")
            .arg(input_dir_arg())
            .arg(config_arg())
            .arg(doctype_arg())
            .arg(output_arg())
            .arg(yes_arg())
    }

    async fn execute(&self, matches: &ArgMatches) -> Result<()> {
        let input: PathBuf = get_required(matches, "input")?;
        let config_path: Option<PathBuf> = get(matches, "config");
        let output: Option<PathBuf> = get(matches, "output");
        let yes = matches.get_flag("yes");
        let extra: Vec<String> = matches
            .get_many::<String>("doctype")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let config = load_config(config_path.as_deref(), extra)?;
        let source = JsonDirectorySource::new(&input);

        let schema = build_schema_from_source(&source, &config)
            .await
            .with_context(|| format!("Failed to build schema from '{}'", input.display()))?;
        let bytes = schema.serialize()?;

        let mut writer = snapshot_writer(output.as_deref(), yes)?;
        writer.write_all(&bytes)?;
        writer.flush()?;

        if let Some(output) = output {
            eprintln!(
                "{} {} doctype(s) and {} dummy doctype(s) to {}",
                "Wrote".green(),
                schema.generated().len(),
                schema.dummies().len(),
                output.display()
            );
        }

        Ok(())
    }
}

fn load_config(path: Option<&Path>, extra: Vec<String>) -> Result<SchemaConfig> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);

    let config = match path {
        Some(path) => SchemaConfig::load(path)?,
        None if default_path.exists() => SchemaConfig::load(default_path)?,
        None if !extra.is_empty() => {
            SchemaConfig::new(extra.clone(), Vec::<DocTypeOverride>::new())?
        }
        None => {
            return Err(anyhow!(
                "No doctypes requested. Pass `--doctype` or provide `{DEFAULT_CONFIG_FILE}`."
            ));
        }
    };

    Ok(config.with_requested(extra))
}
