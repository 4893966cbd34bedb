// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Turn raw descriptors into resolved doctypes.

pub mod doctype;
pub mod field_type;
pub mod nullability;

pub use doctype::{SYSTEM_FIELD_NAMES, resolve_doctype, system_fields};
pub use field_type::{DropReason, map_field, select_options, try_map_field};
pub use nullability::resolve_nullability;
