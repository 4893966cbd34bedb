// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::{Context, Result, bail};
use std::{
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    path::Path,
};

/// Where a serialized snapshot goes: the given file, or stdout when there is none.
///
/// An existing file is only replaced when `overwrite` is set or the user agrees at the prompt.
pub fn snapshot_writer(output: Option<&Path>, overwrite: bool) -> Result<Box<dyn Write + Send>> {
    let Some(path) = output else {
        return Ok(Box::new(io::stdout()));
    };

    if path.is_dir() {
        bail!("`{}` is a directory", path.display());
    }
    if path.exists() && !overwrite {
        let question = format!("Snapshot `{}` already exists. Replace it?", path.display());
        if !confirm(&question, io::stdin().lock(), io::stderr())? {
            bail!("Not replacing `{}`", path.display());
        }
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create `{}`", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Ask a yes/no question; anything but an answer starting with `y` is a no.
fn confirm(question: &str, mut answers: impl BufRead, mut prompt: impl Write) -> Result<bool> {
    write!(prompt, "{question} [y/N]: ")?;
    prompt.flush()?;

    let mut answer = String::new();
    answers.read_line(&mut answer)?;
    Ok(answer.trim_start().to_ascii_lowercase().starts_with('y'))
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write};

    use super::{confirm, snapshot_writer};

    #[test]
    fn only_yes_confirms() {
        for (input, expected) in [
            ("y\n", true),
            ("Yes\n", true),
            ("  y", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
        ] {
            let mut prompt = Vec::new();
            assert_eq!(
                confirm("Replace?", input.as_bytes(), &mut prompt).unwrap(),
                expected,
                "{input:?}"
            );
            assert_eq!(prompt, b"Replace? [y/N]: ");
        }
    }

    #[test]
    fn overwrites_when_asked_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, "stale").unwrap();

        let mut writer = snapshot_writer(Some(&path), true).unwrap();
        writer.write_all(b"fresh").unwrap();
        writer.flush().unwrap();
        drop(writer);

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn refuses_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(snapshot_writer(Some(dir.path()), true).is_err());
    }
}
