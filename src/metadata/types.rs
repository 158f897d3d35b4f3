//! Artist, release and track records shared by every stage of a collection run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque external artist identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtistId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ArtistId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Profile of an artist as returned by the metadata service.
///
/// Stored once per id and never refreshed during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub id: ArtistId,
    pub name: String,
    /// Popularity score in `[0, 100]`.
    pub popularity: u8,
    /// Genres in the order the source lists them.
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Release group of an album listing entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Album,
    Single,
    Compilation,
    #[serde(other)]
    Other,
}

/// An album or single in an artist's discography.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
    pub release_type: ReleaseType,
}

/// A track with its credited artists, in credit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistId>,
}

impl TrackRef {
    /// A track is a collaboration when it credits more than one artist.
    pub fn is_collaboration(&self) -> bool {
        self.artists.len() > 1
    }
}
