use crate::error::CollabResult;
use crate::metadata::types::{AlbumRef, ArtistId, ArtistProfile, TrackRef};
use async_trait::async_trait;

/// Read access to the artist/track metadata service.
///
/// Calls are issued one at a time by the traversal; implementations own their
/// own pacing and retry policy.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch a single artist profile. Unknown ids fail with `NotFound`.
    async fn fetch_artist(&self, id: &ArtistId) -> CollabResult<ArtistProfile>;

    /// List the artist's albums and singles (compilations and appearances excluded).
    async fn fetch_discography(&self, id: &ArtistId) -> CollabResult<Vec<AlbumRef>>;

    /// List the tracks of one album with their credited artists.
    async fn fetch_tracks(&self, album: &AlbumRef) -> CollabResult<Vec<TrackRef>>;

    /// Fetch several profiles in one request.
    ///
    /// The result is aligned with `ids`; `None` marks an id the service could
    /// not resolve.
    async fn fetch_artists_batch(
        &self,
        ids: &[ArtistId],
    ) -> CollabResult<Vec<Option<ArtistProfile>>>;
}
