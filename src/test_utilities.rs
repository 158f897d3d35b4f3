//! In-memory metadata source shared by unit tests.

use crate::error::{CollabError, CollabResult};
use crate::metadata::source::MetadataSource;
use crate::metadata::types::{AlbumRef, ArtistId, ArtistProfile, ReleaseType, TrackRef};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Call recorded by `FakeSource`, in issue order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Artist(String),
    Discography(String),
    Tracks(String),
    Batch(Vec<String>),
}

#[derive(Default)]
pub struct FakeSource {
    profiles: HashMap<ArtistId, ArtistProfile>,
    discographies: HashMap<ArtistId, Vec<AlbumRef>>,
    tracks: HashMap<String, Vec<TrackRef>>,
    failing_profiles: HashSet<ArtistId>,
    failing_discographies: HashSet<ArtistId>,
    fail_batches: bool,
    calls: Mutex<Vec<Call>>,
}

pub fn profile(id: &str, name: &str) -> ArtistProfile {
    ArtistProfile {
        id: ArtistId::from(id),
        name: name.to_string(),
        popularity: 50,
        genres: vec!["pop".to_string()],
    }
}

pub fn track(id: &str, artists: &[&str]) -> TrackRef {
    TrackRef {
        id: id.to_string(),
        name: format!("Track {}", id),
        artists: artists.iter().map(|a| ArtistId::from(*a)).collect(),
    }
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(mut self, id: &str, name: &str) -> Self {
        self.profiles.insert(ArtistId::from(id), profile(id, name));
        self
    }

    /// Registers `requested` as an id the service relinks: its profile comes
    /// back carrying `returned` as the id.
    pub fn with_relinked_artist(mut self, requested: &str, returned: &str, name: &str) -> Self {
        self.profiles
            .insert(ArtistId::from(requested), profile(returned, name));
        self
    }

    /// Adds an album credited to `artist` containing `tracks`.
    pub fn with_album(mut self, artist: &str, album_id: &str, tracks: Vec<TrackRef>) -> Self {
        self.discographies
            .entry(ArtistId::from(artist))
            .or_default()
            .push(AlbumRef {
                id: album_id.to_string(),
                name: format!("Album {}", album_id),
                release_type: ReleaseType::Album,
            });
        self.tracks.insert(album_id.to_string(), tracks);
        self
    }

    pub fn failing_profile(mut self, id: &str) -> Self {
        self.failing_profiles.insert(ArtistId::from(id));
        self
    }

    pub fn failing_discography(mut self, id: &str) -> Self {
        self.failing_discographies.insert(ArtistId::from(id));
        self
    }

    pub fn failing_batches(mut self) -> Self {
        self.fail_batches = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn artist_calls(&self, id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Artist(a) if a == id))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn fetch_artist(&self, id: &ArtistId) -> CollabResult<ArtistProfile> {
        self.record(Call::Artist(id.to_string()));
        if self.failing_profiles.contains(id) {
            return Err(CollabError::Transient(format!("profile {} unavailable", id)));
        }
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| CollabError::NotFound(id.to_string()))
    }

    async fn fetch_discography(&self, id: &ArtistId) -> CollabResult<Vec<AlbumRef>> {
        self.record(Call::Discography(id.to_string()));
        if self.failing_discographies.contains(id) {
            return Err(CollabError::RateLimited { retry_after: None });
        }
        Ok(self.discographies.get(id).cloned().unwrap_or_default())
    }

    async fn fetch_tracks(&self, album: &AlbumRef) -> CollabResult<Vec<TrackRef>> {
        self.record(Call::Tracks(album.id.clone()));
        Ok(self.tracks.get(&album.id).cloned().unwrap_or_default())
    }

    async fn fetch_artists_batch(
        &self,
        ids: &[ArtistId],
    ) -> CollabResult<Vec<Option<ArtistProfile>>> {
        self.record(Call::Batch(ids.iter().map(|id| id.to_string()).collect()));
        if self.fail_batches {
            return Err(CollabError::Transient("batch endpoint down".to_string()));
        }
        Ok(ids.iter().map(|id| self.profiles.get(id).cloned()).collect())
    }
}
