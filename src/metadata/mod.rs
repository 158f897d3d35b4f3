//! Metadata service access.
//!
//! - `types`: artist, album and track records
//! - `source`: the `MetadataSource` trait the traversal is written against
//! - `client`: the HTTP implementation backed by the Spotify Web API

pub mod client;
pub mod source;
pub mod types;

pub use client::SpotifyClient;
pub use source::MetadataSource;
pub use types::{AlbumRef, ArtistId, ArtistProfile, ReleaseType, TrackRef};
