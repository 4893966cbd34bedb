// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Which doctypes to generate and how to adjust them.
//!
//! ```toml
//! doctypes = ["Sales Invoice", "Customer"]
//!
//! [[override]]
//! doctype = "Sales Invoice"
//! strict-typed = true
//! ignored-endpoints = ["delete"]
//! [override.ignored-fields]
//! create = ["amended_from"]
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use doctype_model::overrides::{DocTypeOverride, Operation};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "doctype.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read file '{path}': {source}")]
    IO {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct SchemaConfigSer {
    doctypes: Vec<String>,
    #[serde(rename = "override", default)]
    overrides: Vec<DocTypeOverrideSer>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct DocTypeOverrideSer {
    doctype: String,
    #[serde(default)]
    strict_typed: bool,
    ignored_endpoints: Option<Vec<String>>,
    ignored_fields: Option<IgnoredFieldsSer>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct IgnoredFieldsSer {
    create: Option<Vec<String>>,
    read: Option<Vec<String>>,
    update: Option<Vec<String>>,
    delete: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    requested: BTreeSet<String>,
    overrides: BTreeMap<String, DocTypeOverride>,
}

impl SchemaConfig {
    pub fn new(
        requested: impl IntoIterator<Item = impl Into<String>>,
        overrides: impl IntoIterator<Item = DocTypeOverride>,
    ) -> Result<Self, ConfigError> {
        let requested: BTreeSet<String> = requested.into_iter().map(Into::into).collect();
        if requested.is_empty() {
            return Err(ConfigError::Invalid(
                "'doctypes' must name at least one doctype".to_string(),
            ));
        }

        let mut by_doctype = BTreeMap::new();
        for doctype_override in overrides {
            let doctype = doctype_override.doctype.clone();
            if by_doctype.insert(doctype.clone(), doctype_override).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "Doctype '{doctype}' is overridden more than once"
                )));
            }
        }

        Ok(SchemaConfig {
            requested,
            overrides: by_doctype,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SchemaConfigSer = toml::from_str(content)?;
        config.try_into()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IO {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn requested(&self) -> &BTreeSet<String> {
        &self.requested
    }

    pub fn overrides(&self) -> impl Iterator<Item = &DocTypeOverride> {
        self.overrides.values()
    }

    pub fn override_for(&self, doctype: &str) -> Option<&DocTypeOverride> {
        self.overrides.get(doctype)
    }

    /// Request more doctypes on top of the configured ones
    pub fn with_requested(mut self, extra: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.requested.extend(extra.into_iter().map(Into::into));
        self
    }
}

impl TryFrom<SchemaConfigSer> for SchemaConfig {
    type Error = ConfigError;

    fn try_from(config: SchemaConfigSer) -> Result<Self, Self::Error> {
        let overrides = config
            .overrides
            .into_iter()
            .map(DocTypeOverride::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        SchemaConfig::new(config.doctypes, overrides)
    }
}

impl TryFrom<DocTypeOverrideSer> for DocTypeOverride {
    type Error = ConfigError;

    fn try_from(value: DocTypeOverrideSer) -> Result<Self, Self::Error> {
        let doctype = value.doctype;
        let invalid = |what: &str| {
            ConfigError::Invalid(format!("Override for '{doctype}': {what} must not be empty"))
        };

        let ignored_endpoints = match value.ignored_endpoints {
            Some(endpoints) if endpoints.is_empty() => return Err(invalid("'ignored-endpoints'")),
            Some(endpoints) => endpoints.into_iter().collect(),
            None => BTreeSet::new(),
        };

        let ignored_fields = match value.ignored_fields {
            Some(fields) => {
                let per_operation = [
                    (Operation::Create, "create", fields.create),
                    (Operation::Read, "read", fields.read),
                    (Operation::Update, "update", fields.update),
                    (Operation::Delete, "delete", fields.delete),
                ];

                let mut ignored = BTreeMap::new();
                for (operation, key, names) in per_operation {
                    match names {
                        Some(names) if names.is_empty() => {
                            return Err(invalid(&format!("'ignored-fields.{key}'")));
                        }
                        Some(names) => {
                            ignored.insert(operation, names.into_iter().collect());
                        }
                        None => {}
                    }
                }
                if ignored.is_empty() {
                    return Err(invalid("'ignored-fields'"));
                }
                ignored
            }
            None => BTreeMap::new(),
        };

        Ok(DocTypeOverride {
            doctype,
            strict_typed: value.strict_typed,
            ignored_fields,
            ignored_endpoints,
        })
    }
}
