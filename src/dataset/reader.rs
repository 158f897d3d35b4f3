use crate::dataset::table::{EdgeRow, NodeRow};
use crate::error::{CollabError, CollabResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Reads every row of a headed CSV table.
///
/// A missing file is reported as `ConfigMissing` since tables are inputs the
/// operator points the tool at.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> CollabResult<Vec<T>> {
    if !path.exists() {
        return Err(CollabError::ConfigMissing(format!(
            "table not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn read_nodes(path: &Path) -> CollabResult<Vec<NodeRow>> {
    read_rows(path)
}

pub fn read_edges(path: &Path) -> CollabResult<Vec<EdgeRow>> {
    read_rows(path)
}
