// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Quote each name and join them for an error message.
///
/// e.g. `quoted_list(["Customer", "Item", "User"]) == "'Customer', 'Item' and 'User'"`
pub fn quoted_list(names: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    let quoted: Vec<String> = names
        .into_iter()
        .map(|name| format!("'{}'", name.as_ref()))
        .collect();

    match quoted.as_slice() {
        [] => String::new(),
        [single] => single.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
