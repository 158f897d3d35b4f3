use crate::graph::pairs::EdgeWeights;
use crate::metadata::types::{ArtistId, ArtistProfile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Separator used to flatten genre lists into one column.
///
/// A genre name containing it cannot be recovered on read.
pub const GENRE_SEPARATOR: &str = ";";

/// A serializable row with a fixed column list.
///
/// The header is written even when a table has no rows.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub id: String,
    pub name: String,
    pub popularity: u8,
    pub genres: String,
}

impl TableRow for NodeRow {
    const HEADERS: &'static [&'static str] = &["id", "name", "popularity", "genres"];
}

impl NodeRow {
    /// Row for the registry entry `id`, which may differ from the id the
    /// service reported in `profile` when an artist was relinked.
    pub fn for_artist(id: &ArtistId, profile: &ArtistProfile) -> Self {
        Self {
            id: id.to_string(),
            ..Self::from(profile)
        }
    }

    pub fn genre_list(&self) -> Vec<&str> {
        self.genres
            .split(GENRE_SEPARATOR)
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }
}

impl From<&ArtistProfile> for NodeRow {
    fn from(profile: &ArtistProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name.clone(),
            popularity: profile.popularity,
            genres: profile.genres.join(GENRE_SEPARATOR),
        }
    }
}

/// One canonical pair; `source` sorts before `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    pub weight: u64,
}

impl TableRow for EdgeRow {
    const HEADERS: &'static [&'static str] = &["source", "target", "weight"];
}

/// One row per registry entry, in id order, keyed by the registry id so every
/// edge endpoint that was resolved finds its row.
pub fn node_rows(nodes: &BTreeMap<ArtistId, ArtistProfile>) -> Vec<NodeRow> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes
        .iter()
        .filter(|(id, _)| seen.insert(id.as_str()))
        .map(|(id, profile)| NodeRow::for_artist(id, profile))
        .collect()
}

pub fn edge_rows(edges: &EdgeWeights) -> Vec<EdgeRow> {
    edges
        .iter()
        .map(|(pair, weight)| EdgeRow {
            source: pair.first().to_string(),
            target: pair.second().to_string(),
            weight: *weight,
        })
        .collect()
}
