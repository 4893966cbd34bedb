// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use doctype_model::doctype::Nullability;

/// Classify a field's nullability.
///
/// A field the server declares non-null only becomes `AlwaysNonNull` when its doctype opts into
/// strict typing; otherwise it stays `NonNullUnlessStrict`.
pub fn resolve_nullability(raw_nullable: bool, strict_typed: bool) -> Nullability {
    match (raw_nullable, strict_typed) {
        (true, _) => Nullability::AlwaysNullable,
        (false, true) => Nullability::AlwaysNonNull,
        (false, false) => Nullability::NonNullUnlessStrict,
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_nullability;
    use doctype_model::doctype::Nullability;
    use multiplatform_test::multiplatform_test;

    #[multiplatform_test]
    fn tri_state() {
        assert_eq!(resolve_nullability(true, false), Nullability::AlwaysNullable);
        assert_eq!(resolve_nullability(true, true), Nullability::AlwaysNullable);
        assert_eq!(resolve_nullability(false, true), Nullability::AlwaysNonNull);
        assert_eq!(
            resolve_nullability(false, false),
            Nullability::NonNullUnlessStrict
        );
    }

    #[multiplatform_test]
    fn independent_of_call_order() {
        let inputs = [(false, false), (true, true), (false, true), (true, false)];
        let forward: Vec<_> = inputs
            .iter()
            .map(|(nullable, strict)| resolve_nullability(*nullable, *strict))
            .collect();
        let mut backward: Vec<_> = inputs
            .iter()
            .rev()
            .map(|(nullable, strict)| resolve_nullability(*nullable, *strict))
            .collect();
        backward.reverse();

        assert_eq!(forward, backward);
    }
}
