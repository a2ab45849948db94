/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    Loads system clock/power configurations from JSON files.

--*/

use anyhow::Context;
use pra_common::SystemConfig;
use std::fs;
use std::path::Path;

/// Reads a [`SystemConfig`] from a JSON file.
///
/// Fields missing from the file keep their boot-safe defaults.
pub fn load_config(path: &Path) -> anyhow::Result<SystemConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing configuration {}", path.display()))
}
