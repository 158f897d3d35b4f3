use crate::dataset::table::{GENRE_SEPARATOR, NodeRow, TableRow};
use crate::utilities::dedup_preserving_order;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Macro genres kept per artist.
pub const MAX_MAPPED_GENRES: usize = 2;

/// Fine-grained source genre to macro genre. Genres not listed are dropped.
pub const GENRE_MAPPING: &[(&str, &str)] = &[
    ("reggaeton", "reggaeton"),
    ("reggaeton chileno", "reggaeton"),
    ("reggaeton mexa", "reggaeton"),
    ("trap", "trap"),
    ("trap latino", "trap"),
    ("argentine trap", "trap"),
    ("chilean trap", "trap"),
    ("mexican hip hop", "trap"),
    ("latin hip hop", "trap"),
    ("corrido", "corridos"),
    ("corridos tumbados", "corridos"),
    ("corridos bélicos", "corridos"),
    ("electro corridos", "corridos"),
    ("sad sierreño", "corridos"),
    ("sierreño", "corridos"),
    ("urbano latino", "urbano"),
    ("pop urbano", "urbano"),
    ("banda", "banda"),
    ("norteño", "banda"),
    ("grupera", "banda"),
    ("música mexicana", "banda"),
    ("ranchera", "banda"),
    ("mariachi", "banda"),
    ("cumbia norteña", "banda"),
    ("tejano", "banda"),
    ("latin", "latin"),
    ("latin pop", "latin"),
    ("latin alternative", "latin"),
    ("dembow", "dembow"),
    ("dembow belico", "dembow"),
    ("mambo", "mambo"),
    ("chilean mambo", "mambo"),
    ("hyperpop", "hyperpop"),
    ("neoperreo", "experimental"),
    ("experimental", "experimental"),
    ("hip hop", "hip hop"),
    ("rap", "hip hop"),
    ("old school hip hop", "hip hop"),
    ("east coast hip hop", "hip hop"),
    ("southern hip hop", "hip hop"),
    ("melodic rap", "hip hop"),
    ("boom bap", "hip hop"),
    ("afrobeats", "afro"),
    ("afrobeat", "afro"),
    ("afropop", "afro"),
    ("afropiano", "afro"),
    ("afroswing", "afro"),
    ("afro r&b", "afro"),
    ("latin afrobeats", "afro"),
    ("cumbia", "cumbia"),
    ("cuarteto", "cumbia"),
    ("electrocumbia", "cumbia"),
    ("edm", "electronic"),
    ("dubstep", "electronic"),
    ("electro", "electronic"),
    ("electronic", "electronic"),
    ("tech house", "electronic"),
    ("hard techno", "electronic"),
    ("big room", "electronic"),
    ("moombahton", "electronic"),
    ("rkt", "rkt"),
    ("turreo", "rkt"),
    ("bachata", "bachata"),
    ("salsa", "salsa"),
    ("merengue", "merengue"),
    ("vallenato", "vallenato"),
    ("k-pop", "k-pop"),
    ("k-rap", "k-pop"),
    ("brazilian funk", "funk brasileiro"),
    ("funk carioca", "funk brasileiro"),
    ("funk pop", "funk brasileiro"),
    ("brega funk", "funk brasileiro"),
    ("pop", "pop"),
    ("soft pop", "pop"),
    ("colombian pop", "pop"),
    ("brazilian pop", "pop"),
    ("dancehall", "dancehall"),
    ("drill", "drill"),
    ("uk drill", "drill"),
    ("phonk", "phonk"),
    ("drift phonk", "phonk"),
    ("techengue", "techengue"),
];

pub fn macro_genre(genre: &str) -> Option<&'static str> {
    GENRE_MAPPING
        .iter()
        .find(|(source, _)| *source == genre)
        .map(|(_, mapped)| *mapped)
}

/// Maps a `;`-joined genre column to at most two macro genres, first seen first.
pub fn map_genres(genres: &str) -> String {
    let mapped: Vec<&str> = genres
        .split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .filter_map(macro_genre)
        .collect();

    let mut mapped = dedup_preserving_order(mapped);
    mapped.truncate(MAX_MAPPED_GENRES);
    mapped.join(GENRE_SEPARATOR)
}

/// Node row extended with the mapped genre column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedNodeRow {
    pub id: String,
    pub name: String,
    pub popularity: u8,
    pub genres: String,
    pub genres_mapped: String,
}

impl TableRow for MappedNodeRow {
    const HEADERS: &'static [&'static str] =
        &["id", "name", "popularity", "genres", "genres_mapped"];
}

impl From<NodeRow> for MappedNodeRow {
    fn from(row: NodeRow) -> Self {
        let genres_mapped = map_genres(&row.genres);
        Self {
            id: row.id,
            name: row.name,
            popularity: row.popularity,
            genres: row.genres,
            genres_mapped,
        }
    }
}

pub fn map_nodes(rows: Vec<NodeRow>) -> Vec<MappedNodeRow> {
    rows.into_iter().map(MappedNodeRow::from).collect()
}

/// Occurrences of each macro genre, most common first, ties by name.
pub fn mapped_genre_counts(rows: &[MappedNodeRow]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        for genre in row.genres_mapped.split(GENRE_SEPARATOR) {
            if !genre.is_empty() {
                *counts.entry(genre).or_insert(0) += 1;
            }
        }
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
