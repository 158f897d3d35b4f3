//! HTTP client for the Spotify Web API.
//!
//! # Data Source
//! - API: https://api.spotify.com/v1
//! - Format: JSON, bearer-token authenticated
//! - Method: offset-paginated listings, batch artist lookup by id list
//!
//! Every request passes through a minimum-interval gate owned by the client.
//! Rate-limited (429) and transient (network, 5xx) failures are retried with
//! exponential backoff up to `max_retries`; a `Retry-After` header overrides
//! the computed wait, capped at `max_retry_after_ms`.

use crate::config::{ApiConfig, MAX_API_PAGE};
use crate::error::{CollabError, CollabResult};
use crate::logger;
use crate::metadata::source::MetadataSource;
use crate::metadata::types::{AlbumRef, ArtistId, ArtistProfile, ReleaseType, TrackRef};
use crate::utilities::cache_key;
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const USER_AGENT: &str = concat!("collab-graph/", env!("CARGO_PKG_VERSION"));

// --- API Response Structures ---

#[derive(Debug, Deserialize)]
struct WireArtist {
    id: String,
    name: String,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    genres: Vec<String>,
}

impl From<WireArtist> for ArtistProfile {
    fn from(artist: WireArtist) -> Self {
        ArtistProfile {
            id: ArtistId::new(artist.id),
            name: artist.name,
            popularity: artist.popularity.min(100) as u8,
            genres: artist.genres,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireArtistBatch {
    #[serde(default)]
    artists: Vec<Option<WireArtist>>,
}

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAlbum {
    id: String,
    #[serde(default)]
    name: String,
    album_type: Option<String>,
    album_group: Option<String>,
}

impl WireAlbum {
    fn release_type(&self) -> ReleaseType {
        let kind = self
            .album_group
            .as_deref()
            .or(self.album_type.as_deref())
            .unwrap_or_default();
        match kind.to_ascii_lowercase().as_str() {
            "album" => ReleaseType::Album,
            "single" => ReleaseType::Single,
            "compilation" => ReleaseType::Compilation,
            _ => ReleaseType::Other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireTrack {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<WireArtistRef>,
}

#[derive(Debug, Deserialize)]
struct WireArtistRef {
    id: Option<String>,
}

impl WireTrack {
    /// Tracks without an id (local files) cannot be deduplicated and are dropped.
    fn into_track_ref(self) -> Option<TrackRef> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let artists = self
            .artists
            .into_iter()
            .filter_map(|a| a.id.filter(|id| !id.is_empty()))
            .map(ArtistId::new)
            .collect();
        Some(TrackRef {
            id,
            name: self.name,
            artists,
        })
    }
}

/// Enforces a minimum interval between consecutive requests.
struct RequestGate {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RequestGate {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Spotify Web API client.
///
/// Constructed once per run and passed by reference to the traversal.
pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    page_size: usize,
    max_retries: u32,
    backoff_base: Duration,
    max_retry_after: Duration,
    cache_dir: Option<PathBuf>,
    gate: RequestGate,
}

impl SpotifyClient {
    /// Builds a client with an explicit bearer token.
    pub fn new(config: &ApiConfig, token: impl Into<String>, page_size: usize) -> CollabResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_s))
            .build()
            .map_err(|e| CollabError::ConfigMissing(format!("cannot build HTTP client: {}", e)))?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            CollabError::ConfigMissing(format!("invalid api.base_url {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CollabError::ConfigMissing(format!(
                "api.base_url cannot carry a path: {}",
                config.base_url
            )));
        }

        let cache_dir = config.cache_dir.as_ref().map(PathBuf::from);
        if let Some(dir) = &cache_dir {
            fs::create_dir_all(dir)?;
        }

        Ok(Self {
            http,
            base_url,
            token: token.into(),
            page_size: page_size.clamp(1, MAX_API_PAGE),
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            max_retry_after: Duration::from_millis(config.max_retry_after_ms),
            cache_dir,
            gate: RequestGate::new(Duration::from_millis(config.min_request_interval_ms)),
        })
    }

    /// Builds a client reading the bearer token from the environment variable
    /// named by `config.token_env`.
    pub fn from_env(config: &ApiConfig, page_size: usize) -> CollabResult<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CollabError::ConfigMissing(format!(
                    "environment variable {} is not set",
                    config.token_env
                ))
            })?;
        Self::new(config, token, page_size)
    }

    /// Builds a request URL below the base, percent-encoding every path segment
    /// and query value so ids cannot alter the request.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url.to_string()
    }

    /// GET with cache lookup and bounded retries, decoded as JSON.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> CollabResult<T> {
        if let Some(body) = self.read_cache(url) {
            match serde_json::from_str(&body) {
                Ok(value) => return Ok(value),
                Err(e) => logger::warn(&format!("Discarding unreadable cache entry for {}: {}", url, e)),
            }
        }

        let mut attempt: u32 = 0;
        let body = loop {
            match self.send_once(url).await {
                Ok(body) => break body,
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let wait = match &e {
                        CollabError::RateLimited {
                            retry_after: Some(after),
                        } => (*after).min(self.max_retry_after),
                        _ => self.backoff_base * 2u32.saturating_pow(attempt),
                    };
                    logger::warn(&format!(
                        "Request to {} failed ({}); retry {}/{} in {:?}",
                        url,
                        e,
                        attempt + 1,
                        self.max_retries,
                        wait
                    ));
                    sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let value = serde_json::from_str(&body)
            .map_err(|e| CollabError::Parse(format!("{}: {}", url, e)))?;
        self.write_cache(url, &body);
        Ok(value)
    }

    async fn send_once(&self, url: &str) -> CollabResult<String> {
        self.gate.wait().await;
        logger::debug(&format!("GET {}", url));

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| CollabError::Transient(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(CollabError::RateLimited { retry_after });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(CollabError::NotFound(url.to_string()));
        }

        if status.is_server_error() {
            return Err(CollabError::Transient(format!("HTTP {} from {}", status, url)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollabError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| CollabError::Transient(e.to_string()))
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", cache_key(url))))
    }

    fn read_cache(&self, url: &str) -> Option<String> {
        let path = self.cache_path(url)?;
        fs::read_to_string(path).ok()
    }

    // Only successful, decodable responses reach the cache.
    fn write_cache(&self, url: &str, body: &str) {
        if let Some(path) = self.cache_path(url) {
            if let Err(e) = fs::write(&path, body) {
                logger::warn(&format!("Failed to cache {}: {}", url, e));
            }
        }
    }

    /// Collects every page of an offset-paginated listing.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        extra_query: &[(&str, &str)],
    ) -> CollabResult<Vec<T>> {
        let mut items = Vec::new();
        let mut offset = 0usize;
        let limit = self.page_size.to_string();

        loop {
            let offset_value = offset.to_string();
            let mut query = extra_query.to_vec();
            query.push(("limit", &limit));
            query.push(("offset", &offset_value));

            let page: Paging<T> = self.get_json(&self.endpoint(segments, &query)).await?;

            let fetched = page.items.len();
            items.extend(page.items);
            offset += fetched;

            if page.next.is_none() || fetched == 0 {
                break;
            }
        }

        Ok(items)
    }
}

/// Maps URL-level failures of a per-artist request onto the artist id.
fn for_artist(id: &ArtistId, err: CollabError) -> CollabError {
    match err {
        CollabError::NotFound(_) => CollabError::NotFound(id.to_string()),
        CollabError::Api { status: 400, .. } => CollabError::NotFound(id.to_string()),
        other => other,
    }
}

#[async_trait]
impl MetadataSource for SpotifyClient {
    async fn fetch_artist(&self, id: &ArtistId) -> CollabResult<ArtistProfile> {
        let artist: WireArtist = self
            .get_json(&self.endpoint(&["artists", id.as_str()], &[]))
            .await
            .map_err(|e| for_artist(id, e))?;
        Ok(artist.into())
    }

    async fn fetch_discography(&self, id: &ArtistId) -> CollabResult<Vec<AlbumRef>> {
        let albums: Vec<WireAlbum> = self
            .get_all_pages(
                &["artists", id.as_str(), "albums"],
                &[("include_groups", "album,single")],
            )
            .await
            .map_err(|e| for_artist(id, e))?;

        let mut seen = HashSet::new();
        let albums = albums
            .into_iter()
            .filter(|album| seen.insert(album.id.clone()))
            .filter_map(|album| {
                let release_type = album.release_type();
                matches!(release_type, ReleaseType::Album | ReleaseType::Single).then(|| AlbumRef {
                    id: album.id,
                    name: album.name,
                    release_type,
                })
            })
            .collect();

        Ok(albums)
    }

    async fn fetch_tracks(&self, album: &AlbumRef) -> CollabResult<Vec<TrackRef>> {
        let tracks: Vec<WireTrack> = self
            .get_all_pages(&["albums", album.id.as_str(), "tracks"], &[])
            .await?;
        Ok(tracks.into_iter().filter_map(WireTrack::into_track_ref).collect())
    }

    async fn fetch_artists_batch(
        &self,
        ids: &[ArtistId],
    ) -> CollabResult<Vec<Option<ArtistProfile>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() > MAX_API_PAGE {
            return Err(CollabError::Api {
                status: 400,
                body: format!("batch of {} ids exceeds limit of {}", ids.len(), MAX_API_PAGE),
            });
        }

        let joined = ids
            .iter()
            .map(ArtistId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let batch: WireArtistBatch = self
            .get_json(&self.endpoint(&["artists"], &[("ids", joined.as_str())]))
            .await?;

        let mut profiles: Vec<Option<ArtistProfile>> = batch
            .artists
            .into_iter()
            .map(|a| a.map(ArtistProfile::from))
            .collect();
        profiles.resize(ids.len(), None);
        Ok(profiles)
    }
}
