//! Helper functions shared by the client and the traversal.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::hash::Hash;

/// Computes the on-disk cache key for a request URL.
///
/// The key is the hexadecimal SHA-256 digest of the full URL, including the
/// query string, so every page of a paginated listing is cached separately.
///
/// # Example
/// ```
/// use collab_graph::utilities::cache_key;
///
/// let key = cache_key("https://api.spotify.com/v1/artists/abc123");
/// assert_eq!(key.len(), 64); // SHA-256 produces 64 hex characters
/// ```
pub fn cache_key(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

/// Removes duplicates while keeping the first occurrence of each item in place.
///
/// # Example
/// ```
/// use collab_graph::utilities::dedup_preserving_order;
///
/// let ids = vec!["b", "a", "b", "c", "a"];
/// assert_eq!(dedup_preserving_order(ids), vec!["b", "a", "c"]);
/// ```
pub fn dedup_preserving_order<T>(items: Vec<T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
