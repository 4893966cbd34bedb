// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Build a [`Schema`](doctype_model::schema::Schema) from the raw records a server reports.
//!
//! The pipeline is: collect the raw snapshot, resolve every doctype's fields, take the closure
//! of the requested doctypes, and group the whitelisted functions into a namespace tree.

pub mod closure;
pub mod config;
pub mod error;
pub mod resolver;
mod schema_builder;
pub mod source;
mod util;
pub mod whitelist;

pub use config::SchemaConfig;
pub use error::SchemaBuildingError;
pub use schema_builder::{build_schema, build_schema_from_source};
pub use source::{JsonDirectorySource, RawSnapshot, RecordSource, collect_snapshot};
