use crate::dataset::table::{TableRow, edge_rows, node_rows};
use crate::error::CollabResult;
use crate::graph::traversal::CollectionState;
use crate::logger;
use std::fs;
use std::path::{Path, PathBuf};

pub const NODES_FILE: &str = "nodes.csv";
pub const EDGES_FILE: &str = "edges.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
    pub node_count: usize,
    pub edge_count: usize,
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `rows` to `path` as CSV, replacing any existing file atomically.
pub fn write_rows<T: TableRow>(path: &Path, rows: &[T]) -> CollabResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = (|| -> CollabResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp)?;
        writer.write_record(T::HEADERS)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path)?;
    logger::debug(&format!("Wrote {} rows to {}", rows.len(), path.display()));
    Ok(())
}

/// Writes the node and edge tables of `state` into `dir`.
pub fn write_dataset(dir: &Path, state: &CollectionState) -> CollabResult<DatasetSummary> {
    fs::create_dir_all(dir)?;

    let nodes = node_rows(&state.nodes);
    let edges = edge_rows(&state.edges);

    let nodes_path = dir.join(NODES_FILE);
    let edges_path = dir.join(EDGES_FILE);
    write_rows(&nodes_path, &nodes)?;
    write_rows(&edges_path, &edges)?;

    logger::info(&format!(
        "Saved {} nodes to {} and {} edges to {}",
        nodes.len(),
        nodes_path.display(),
        edges.len(),
        edges_path.display()
    ));

    Ok(DatasetSummary {
        nodes_path,
        edges_path,
        node_count: nodes.len(),
        edge_count: edges.len(),
    })
}
