// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Fetch the raw records a schema is built from.
//!
//! The four record sets are independent, so they are fetched concurrently. Resolution only starts
//! once all of them are in: a [`RawSnapshot`] is either complete or not produced at all.

use std::path::PathBuf;

use async_trait::async_trait;
use doctype_model::{
    raw::{RawCustomField, RawDocType, RawField},
    whitelist::WhitelistFunction,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod json_directory;

pub use json_directory::JsonDirectorySource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Generic(String),
}

/// Everything the resolver needs, fully materialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub doctypes: Vec<RawDocType>,
    pub fields: Vec<RawField>,
    #[serde(default)]
    pub custom_fields: Vec<RawCustomField>,
    #[serde(default)]
    pub whitelist_functions: Vec<WhitelistFunction>,
}

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn doctypes(&self) -> Result<Vec<RawDocType>, SourceError>;
    async fn fields(&self) -> Result<Vec<RawField>, SourceError>;
    async fn custom_fields(&self) -> Result<Vec<RawCustomField>, SourceError>;
    async fn whitelist_functions(&self) -> Result<Vec<WhitelistFunction>, SourceError>;
}

/// Fetch all record sets concurrently. The first failure abandons the others.
pub async fn collect_snapshot<S>(source: &S) -> Result<RawSnapshot, SourceError>
where
    S: RecordSource + ?Sized,
{
    let (doctypes, fields, custom_fields, whitelist_functions) = futures::try_join!(
        source.doctypes(),
        source.fields(),
        source.custom_fields(),
        source.whitelist_functions(),
    )?;

    debug!(
        doctypes = doctypes.len(),
        fields = fields.len(),
        custom_fields = custom_fields.len(),
        whitelist_functions = whitelist_functions.len(),
        "Collected raw records"
    );

    Ok(RawSnapshot {
        doctypes,
        fields,
        custom_fields,
        whitelist_functions,
    })
}
