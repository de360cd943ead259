//! Input file lists and snapshot identifiers.

use std::fs;
use std::path::Path;

use super::loader::SnapshotSource;
use crate::util::{Error, Result};

/// Read a list of snapshot paths separated by whitespace or newlines.
pub fn read_file_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_file_list(&text))
}

/// Split file list text into paths.
pub fn parse_file_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Extract the snapshot identifier from a path.
///
/// The identifier is everything after the first `"<snapshot_name>."`, so
/// `out/run.00128` with name `run` gives `00128`.
pub fn snapshot_id(path: &str, snapshot_name: &str) -> Result<String> {
    let key = format!("{}.", snapshot_name);
    path.find(&key)
        .map(|pos| path[pos + key.len()..].to_string())
        .ok_or_else(|| Error::invalid_arg(format!("'{}' does not contain '{}'", path, key)))
}

/// Pair every path with its identifier.
pub fn sources_from_paths<S: AsRef<str>>(paths: &[S], snapshot_name: &str) -> Result<Vec<SnapshotSource>> {
    paths
        .iter()
        .map(|p| {
            let p = p.as_ref();
            Ok(SnapshotSource::new(snapshot_id(p, snapshot_name)?, p))
        })
        .collect()
}
