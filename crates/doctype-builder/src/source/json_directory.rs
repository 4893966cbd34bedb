// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use doctype_model::{
    raw::{RawCustomField, RawDocType, RawField},
    whitelist::WhitelistFunction,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{RecordSource, SourceError};

pub const DOCTYPES_FILE: &str = "doctypes.json";
pub const FIELDS_FILE: &str = "fields.json";
pub const CUSTOM_FIELDS_FILE: &str = "custom_fields.json";
pub const WHITELIST_FILE: &str = "whitelist.json";

/// Records exported as JSON arrays, one file per record set. Custom fields and whitelisted
/// functions may be absent.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, SourceError> {
        let path = self.root.join(file_name);
        let content = tokio::fs::read(&path)
            .await
            .map_err(|source| SourceError::Read {
                path: path.clone(),
                source,
            })?;

        serde_json::from_slice(&content).map_err(|source| SourceError::Decode { path, source })
    }

    async fn read_optional<T: DeserializeOwned>(
        &self,
        file_name: &str,
    ) -> Result<Vec<T>, SourceError> {
        match self.read(file_name).await {
            Err(SourceError::Read { path, source }) if source.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Optional record file is absent");
                Ok(vec![])
            }
            result => result,
        }
    }
}

#[async_trait]
impl RecordSource for JsonDirectorySource {
    async fn doctypes(&self) -> Result<Vec<RawDocType>, SourceError> {
        self.read(DOCTYPES_FILE).await
    }

    async fn fields(&self) -> Result<Vec<RawField>, SourceError> {
        self.read(FIELDS_FILE).await
    }

    async fn custom_fields(&self) -> Result<Vec<RawCustomField>, SourceError> {
        self.read_optional(CUSTOM_FIELDS_FILE).await
    }

    async fn whitelist_functions(&self) -> Result<Vec<WhitelistFunction>, SourceError> {
        self.read_optional(WHITELIST_FILE).await
    }
}
