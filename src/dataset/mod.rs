//! Persisted node and edge tables.
//!
//! Tables are CSV files with a header row. Writers go through a temporary
//! file in the target directory and rename it into place, so a crash never
//! leaves a half-written table under the final name.

pub mod reader;
pub mod table;
pub mod writer;

pub use reader::{read_edges, read_nodes, read_rows};
pub use table::{EdgeRow, GENRE_SEPARATOR, NodeRow, TableRow, edge_rows, node_rows};
pub use writer::{DatasetSummary, EDGES_FILE, NODES_FILE, write_dataset, write_rows};
