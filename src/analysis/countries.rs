//! Country-level collaboration graph.
//!
//! Every artist edge whose endpoints both have a known country contributes
//! its weight to the sorted country pair. Collaborations inside one country
//! are kept as self-loops.

use crate::dataset::table::{EdgeRow, TableRow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Input row of the artist nationality table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationalityRow {
    pub spotify_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryNodeRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Label")]
    pub label: String,
}

impl TableRow for CountryNodeRow {
    const HEADERS: &'static [&'static str] = &["Id", "Label"];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEdgeRow {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "Weight")]
    pub weight: u64,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl TableRow for CountryEdgeRow {
    const HEADERS: &'static [&'static str] = &["Source", "Target", "Weight", "Type"];
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountryGraph {
    pub nodes: Vec<CountryNodeRow>,
    /// Heaviest first.
    pub edges: Vec<CountryEdgeRow>,
}

impl CountryGraph {
    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}

fn known_country(country: Option<&String>) -> Option<&str> {
    let country = country?.trim();
    if country.is_empty() || country.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(country)
    }
}

pub fn build_country_graph(nationalities: &[NationalityRow], edges: &[EdgeRow]) -> CountryGraph {
    let country_of: HashMap<&str, &String> = nationalities
        .iter()
        .filter_map(|row| row.country.as_ref().map(|c| (row.spotify_id.as_str(), c)))
        .collect();

    let mut weights: BTreeMap<(String, String), u64> = BTreeMap::new();
    for edge in edges {
        let source = known_country(country_of.get(edge.source.as_str()).copied());
        let target = known_country(country_of.get(edge.target.as_str()).copied());
        let (Some(a), Some(b)) = (source, target) else {
            continue;
        };
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        *weights.entry(key).or_insert(0) += edge.weight;
    }

    let countries: BTreeSet<&String> = weights.keys().flat_map(|(a, b)| [a, b]).collect();
    let nodes = countries
        .into_iter()
        .map(|c| CountryNodeRow {
            id: c.clone(),
            label: c.clone(),
        })
        .collect();

    let mut edges: Vec<CountryEdgeRow> = weights
        .into_iter()
        .map(|((source, target), weight)| CountryEdgeRow {
            source,
            target,
            weight,
            kind: "Undirected".to_string(),
        })
        .collect();
    // Stable, so equal weights keep pair order.
    edges.sort_by(|a, b| b.weight.cmp(&a.weight));

    CountryGraph { nodes, edges }
}
