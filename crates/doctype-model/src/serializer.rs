// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The persisted schema snapshot.
//!
//! The "generate schema" and "generate code" phases may run as separate invocations, so the
//! snapshot carries a header that both must agree on. The body is pretty-printed JSON whose
//! collections are all ordered, which makes the output a pure function of the schema.

use serde::{Deserialize, Serialize};

use crate::{error::SchemaSerializationError, schema::Schema};

/// Bump when the shape of [`Schema`] changes incompatibly
pub const FORMAT_VERSION: u32 = 1;

pub trait SchemaSerializer {
    type Underlying;

    fn serialize(&self) -> Result<Vec<u8>, SchemaSerializationError>;

    fn deserialize_reader(
        reader: impl std::io::Read,
    ) -> Result<Self::Underlying, SchemaSerializationError>;

    fn deserialize(bytes: &[u8]) -> Result<Self::Underlying, SchemaSerializationError> {
        Self::deserialize_reader(bytes)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Header {
    builder_version: String,
    format_version: u32,
}

impl Header {
    fn current() -> Header {
        Header {
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            format_version: FORMAT_VERSION,
        }
    }

    fn check_header(&self, header: &Header) -> Result<(), String> {
        if self.format_version != header.format_version {
            return Err(format!(
                "Format version for this snapshot {0} does not match current version {1}",
                header.format_version, self.format_version
            ));
        }
        if self.builder_version != header.builder_version {
            return Err(format!(
                "Builder version for this snapshot {0} does not match current version {1}",
                header.builder_version, self.builder_version
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    header: &'a Header,
    schema: &'a Schema,
}

#[derive(Deserialize)]
struct HeaderOnly {
    header: Header,
}

#[derive(Deserialize)]
struct Snapshot {
    schema: Schema,
}

impl SchemaSerializer for Schema {
    type Underlying = Self;

    fn serialize(&self) -> Result<Vec<u8>, SchemaSerializationError> {
        serialize_with_header(&Header::current(), self)
    }

    fn deserialize_reader(
        mut reader: impl std::io::Read,
    ) -> Result<Self::Underlying, SchemaSerializationError> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;

        // Check the header before decoding the body, so that a version mismatch is reported as
        // such rather than as a shape error
        let HeaderOnly { header } =
            serde_json::from_slice(&bytes).map_err(SchemaSerializationError::Deserialize)?;
        Header::current()
            .check_header(&header)
            .map_err(SchemaSerializationError::Header)?;

        let Snapshot { schema } =
            serde_json::from_slice(&bytes).map_err(SchemaSerializationError::Deserialize)?;
        Ok(schema)
    }
}

fn serialize_with_header(
    header: &Header,
    schema: &Schema,
) -> Result<Vec<u8>, SchemaSerializationError> {
    let mut bytes = serde_json::to_vec_pretty(&SnapshotRef { header, schema })
        .map_err(SchemaSerializationError::Serialize)?;
    bytes.push(b'\n');
    Ok(bytes)
}
