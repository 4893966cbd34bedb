// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Data model for DocType schemas: the raw records a server reports, and the resolved,
//! strongly-typed schema built from them.

pub mod doctype;
pub mod error;
pub mod overrides;
pub mod raw;
pub mod schema;
pub mod serializer;
pub mod token;
pub mod whitelist;
