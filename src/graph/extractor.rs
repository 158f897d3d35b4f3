//! Derives collaboration pairs from an artist's discography.
//!
//! Every track credited to more than one artist contributes all C(n, 2)
//! pairs among its credits, not only the pairs involving the scanned artist.
//! Tracks are deduplicated by id because the same recording is often
//! released both as a single and on an album. The returned set is already
//! deduplicated; weighting across the run is the traversal's job.

use crate::error::CollabResult;
use crate::graph::pairs::CollaborationPair;
use crate::logger;
use crate::metadata::source::MetadataSource;
use crate::metadata::types::{ArtistId, TrackRef};
use std::collections::{BTreeSet, HashSet};
use std::time::Duration;
use tokio::time::sleep;

/// All unordered pairs among the credited artists of one track.
pub fn track_pairs(track: &TrackRef) -> Vec<CollaborationPair> {
    let artists = &track.artists;
    let mut pairs = Vec::new();
    for i in 0..artists.len() {
        for j in (i + 1)..artists.len() {
            if let Some(pair) = CollaborationPair::new(artists[i].clone(), artists[j].clone()) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// Accumulates pairs over the tracks of one discography scan.
#[derive(Debug, Default)]
pub struct CollaborationExtractor {
    seen_tracks: HashSet<String>,
    pairs: BTreeSet<CollaborationPair>,
}

impl CollaborationExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one track; returns `false` if the track id was already seen.
    pub fn add_track(&mut self, track: &TrackRef) -> bool {
        if !self.seen_tracks.insert(track.id.clone()) {
            return false;
        }
        if track.is_collaboration() {
            self.pairs.extend(track_pairs(track));
        }
        true
    }

    pub fn tracks_seen(&self) -> usize {
        self.seen_tracks.len()
    }

    pub fn finish(self) -> BTreeSet<CollaborationPair> {
        self.pairs
    }
}

/// Extracts the deduplicated pair set from already-fetched tracks.
pub fn extract_pairs<'a, I>(tracks: I) -> BTreeSet<CollaborationPair>
where
    I: IntoIterator<Item = &'a TrackRef>,
{
    let mut extractor = CollaborationExtractor::new();
    for track in tracks {
        extractor.add_track(track);
    }
    extractor.finish()
}

/// Scans the discography of `artist` and returns its collaboration pairs.
///
/// `album_delay` is slept before every track listing request. Any fetch
/// failure aborts the scan for this artist.
pub async fn collect_collaborations<S>(
    source: &S,
    artist: &ArtistId,
    album_delay: Duration,
) -> CollabResult<BTreeSet<CollaborationPair>>
where
    S: MetadataSource + ?Sized,
{
    let albums = source.fetch_discography(artist).await?;
    let mut extractor = CollaborationExtractor::new();

    for album in &albums {
        if !album_delay.is_zero() {
            sleep(album_delay).await;
        }
        let tracks = source.fetch_tracks(album).await?;
        for track in &tracks {
            extractor.add_track(track);
        }
    }

    logger::debug(&format!(
        "Scanned {} releases / {} tracks for {}",
        albums.len(),
        extractor.tracks_seen(),
        artist
    ));

    Ok(extractor.finish())
}
